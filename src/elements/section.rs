//! Pipe cross-section properties

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// Pipe cross-section (dimensions in metres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Outer diameter
    pub od: f64,
    /// Nominal wall thickness
    pub thk: f64,
    /// Corrosion allowance
    pub corra: f64,
    /// Mill tolerance as a fraction of the wall (0.125 = 12.5%)
    pub milltol: f64,
}

impl Entity for Section {
    const KIND: EntityKind = EntityKind::Section;
}

impl Section {
    /// Create a pipe section with no corrosion or mill allowance
    pub fn pipe(od: f64, thk: f64) -> Self {
        Self {
            od,
            thk,
            corra: 0.0,
            milltol: 0.0,
        }
    }

    pub fn with_corrosion(mut self, corra: f64) -> Self {
        self.corra = corra;
        self
    }

    pub fn with_mill_tolerance(mut self, milltol: f64) -> Self {
        self.milltol = milltol;
        self
    }

    /// Wall left after mill tolerance and corrosion
    pub fn effective_thickness(&self) -> f64 {
        self.thk * (1.0 - self.milltol) - self.corra
    }
}
