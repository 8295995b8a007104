//! Error types for the piping code-check core

use thiserror::Error;

use crate::entity::EntityKind;

/// Coarse classification of a [`PipeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Name collision or no active model
    Identity,
    /// Entity rejected at construction (e.g. SIF topology)
    Validation,
    /// Name or id not found in a container
    Lookup,
    /// Invalid configuration such as an unknown combination method
    Configuration,
    /// Missing or malformed analysis results
    Analysis,
    /// Serialization / IO failure
    Io,
}

/// Main error type for registry and code-check operations
#[derive(Error, Debug)]
pub enum PipeError {
    #[error("No active model - create or activate a model first")]
    NoActiveModel,

    #[error("{kind} name '{name}' already in use")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("{kind} with id #{id} not found")]
    InvalidId { kind: EntityKind, id: u32 },

    #[error("Invalid {sif} at point '{point}': expected {expected} edges, found {found}")]
    InvalidSifPoint {
        sif: String,
        point: String,
        expected: usize,
        found: usize,
    },

    #[error("Element '{element}' has no {property} assigned")]
    MissingProperty { element: String, property: &'static str },

    #[error("Unsupported load combination method '{0}'")]
    UnsupportedMethod(String),

    #[error("Unknown stress type '{0}'")]
    UnknownStressType(String),

    #[error("Load combination '{0}' has no load cases")]
    EmptyCombination(String),

    #[error("Load case '{0}' has no force results - run the solver first")]
    NotAnalyzed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl PipeError {
    /// Map the error onto the code-check error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipeError::NoActiveModel | PipeError::DuplicateName { .. } => ErrorKind::Identity,
            PipeError::InvalidSifPoint { .. } | PipeError::InvalidInput(_) => ErrorKind::Validation,
            PipeError::NotFound { .. }
            | PipeError::InvalidId { .. }
            | PipeError::MissingProperty { .. } => ErrorKind::Lookup,
            PipeError::UnsupportedMethod(_)
            | PipeError::UnknownStressType(_)
            | PipeError::EmptyCombination(_) => ErrorKind::Configuration,
            PipeError::NotAnalyzed(_) => ErrorKind::Analysis,
            PipeError::SerializationError(_) => ErrorKind::Io,
        }
    }
}

/// Result type for registry and code-check operations
pub type PipeResult<T> = Result<T, PipeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = PipeError::DuplicateName {
            kind: EntityKind::Point,
            name: "P1".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Identity);
        assert_eq!(err.to_string(), "Point name 'P1' already in use");

        let err = PipeError::UnsupportedMethod("weird".to_string());
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
