//! Insulation properties

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// External insulation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insulation {
    /// Density in kg/m³
    pub rho: f64,
    /// Thickness in m
    pub thk: f64,
}

impl Entity for Insulation {
    const KIND: EntityKind = EntityKind::Insulation;
}

impl Insulation {
    pub fn new(rho: f64, thk: f64) -> Self {
        Self { rho, thk }
    }
}
