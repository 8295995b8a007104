//! Material properties

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// Pipe material with code allowable stresses (Pa, kg/m³)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density
    pub rho: f64,
    /// Basic allowable stress at the minimum (cold) temperature
    pub sc: f64,
    /// Basic allowable stress at the maximum (hot) temperature
    pub sh: f64,
}

impl Entity for Material {
    const KIND: EntityKind = EntityKind::Material;
}

impl Material {
    /// Create a material with the given allowables and steel-like stiffness
    pub fn new(sc: f64, sh: f64) -> Self {
        Self {
            sc,
            sh,
            ..Self::a106b()
        }
    }

    /// Carbon steel A106 Grade B, allowables at ambient / 650°F
    pub fn a106b() -> Self {
        Self {
            e: 203.4e9,
            nu: 0.3,
            rho: 7833.0,
            sc: 137.9e6, // 20.0 ksi
            sh: 131.0e6, // 19.0 ksi
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::a106b()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_allowables_keep_stiffness() {
        let mat = Material::new(100e6, 90e6);
        assert_eq!(mat.sc, 100e6);
        assert_eq!(mat.sh, 90e6);
        assert_eq!(mat.e, Material::a106b().e);
    }
}
