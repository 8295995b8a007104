//! Primitive loads applied to elements

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// A load definition; load cases pick which loads they include
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Load {
    /// Self weight scaled by a gravity factor
    Weight { gfac: f64 },
    /// Internal design pressure in Pa
    Pressure { pres: f64 },
    /// Operating temperature in °C
    Thermal { temp: f64 },
    /// Concentrated nodal force [FX, FY, FZ, MX, MY, MZ] in N and N·m
    Force { values: [f64; 6] },
}

impl Entity for Load {
    const KIND: EntityKind = EntityKind::Load;
}

impl Load {
    pub fn weight() -> Self {
        Load::Weight { gfac: 1.0 }
    }

    pub fn pressure(pres: f64) -> Self {
        Load::Pressure { pres }
    }

    pub fn thermal(temp: f64) -> Self {
        Load::Thermal { temp }
    }

    pub fn force(values: [f64; 6]) -> Self {
        Load::Force { values }
    }

    /// Pressure carried by this load, if it is a pressure load
    pub fn as_pressure(&self) -> Option<f64> {
        match self {
            Load::Pressure { pres } => Some(*pres),
            _ => None,
        }
    }
}
