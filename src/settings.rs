//! Model settings and code-check options

use serde::{Deserialize, Serialize};

use crate::error::PipeResult;
use crate::units::UnitSystem;

/// Global vertical axis of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Vertical {
    #[default]
    Y,
    Z,
}

/// Per-model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// User unit system; applied to the workspace when the model is activated
    pub units: UnitSystem,
    /// Vertical direction
    pub vertical: Vertical,
    /// Reference (installation) temperature in °C
    pub tref: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units: UnitSystem::Si,
            vertical: Vertical::Y,
            tref: 21.1,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> PipeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn with_vertical(mut self, vertical: Vertical) -> Self {
        self.vertical = vertical;
        self
    }

    pub fn with_tref(mut self, tref: f64) -> Self {
        self.tref = tref;
        self
    }
}

/// Options for the code-check engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Unit system the code equations are calibrated to
    pub code_units: UnitSystem,
    /// Result column of the force tables to read
    pub column: usize,
    /// Enable per-point logging
    pub log: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            code_units: UnitSystem::CodeEnglish,
            column: 0,
            log: false,
        }
    }
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the code equations in a different unit system
    pub fn with_code_units(mut self, units: UnitSystem) -> Self {
        self.code_units = units;
        self
    }

    /// Read a different result column of the force tables
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }
}
