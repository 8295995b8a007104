//! Report definitions
//!
//! Reports are plain records naming what to output for which load cases;
//! rendering them belongs to the front end.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, Id};
use crate::loads::Case;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    Movements,
    Reactions,
    Forces,
    Stresses,
}

/// A named report over a list of load cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub loadcases: Vec<Id<Case>>,
}

impl Entity for Report {
    const KIND: EntityKind = EntityKind::Report;
}

impl Report {
    pub fn new(kind: ReportKind, loadcases: &[Id<Case>]) -> Self {
        Self {
            kind,
            loadcases: loadcases.to_vec(),
        }
    }

    pub fn stresses(loadcases: &[Id<Case>]) -> Self {
        Self::new(ReportKind::Stresses, loadcases)
    }
}
