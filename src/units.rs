//! Unit systems and the scoped unit override
//!
//! Model quantities are stored in SI base units (m, N, N·m, Pa, °C). Code
//! formulas read them through [`Units`], which converts into whatever system
//! is currently in force. Code equations are calibrated to a fixed system, so
//! the engine runs them inside [`Units::scoped`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipeError, PipeResult};

/// A consistent set of output units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// m, N, N·m, Pa
    #[default]
    Si,
    /// ft, lbf, ft·lbf, psi
    English,
    /// in, lbf, in·lbf, psi (the convention of the ASME piping codes)
    CodeEnglish,
}

impl UnitSystem {
    /// Multiplier from metres
    pub fn length_factor(self) -> f64 {
        match self {
            UnitSystem::Si => 1.0,
            UnitSystem::English => 1.0 / 0.3048,
            UnitSystem::CodeEnglish => 1.0 / 0.0254,
        }
    }

    /// Multiplier from newtons
    pub fn force_factor(self) -> f64 {
        match self {
            UnitSystem::Si => 1.0,
            UnitSystem::English | UnitSystem::CodeEnglish => 1.0 / 4.448_221_615_260_5,
        }
    }

    /// Multiplier from newton-metres
    pub fn moment_factor(self) -> f64 {
        self.force_factor() * self.length_factor()
    }

    /// Multiplier from pascals (stress and pressure)
    pub fn stress_factor(self) -> f64 {
        match self {
            UnitSystem::Si => 1.0,
            UnitSystem::English | UnitSystem::CodeEnglish => 1.0 / 6_894.757_293_168,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitSystem::Si => "si",
            UnitSystem::English => "english",
            UnitSystem::CodeEnglish => "code_english",
        };
        f.write_str(name)
    }
}

impl FromStr for UnitSystem {
    type Err = PipeError;

    fn from_str(s: &str) -> PipeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "si" => Ok(UnitSystem::Si),
            "english" => Ok(UnitSystem::English),
            "code_english" => Ok(UnitSystem::CodeEnglish),
            other => Err(PipeError::InvalidInput(format!("unknown unit system '{other}'"))),
        }
    }
}

/// The current unit system, with conversions out of SI base units
#[derive(Debug, Clone, Default)]
pub struct Units {
    current: UnitSystem,
}

impl Units {
    pub fn new(system: UnitSystem) -> Self {
        Self { current: system }
    }

    pub fn current(&self) -> UnitSystem {
        self.current
    }

    /// Change the user unit system outside of any override
    pub fn set_user_units(&mut self, system: UnitSystem) {
        self.current = system;
    }

    /// Run `f` with `system` in force and restore the previous system
    /// before returning, whatever `f` returned
    pub fn scoped<R>(&mut self, system: UnitSystem, f: impl FnOnce(&Units) -> R) -> R {
        let previous = std::mem::replace(&mut self.current, system);
        let out = f(self);
        self.current = previous;
        out
    }

    pub fn length(&self, metres: f64) -> f64 {
        metres * self.current.length_factor()
    }

    pub fn force(&self, newtons: f64) -> f64 {
        newtons * self.current.force_factor()
    }

    pub fn moment(&self, newton_metres: f64) -> f64 {
        newton_metres * self.current.moment_factor()
    }

    pub fn stress(&self, pascals: f64) -> f64 {
        pascals * self.current.stress_factor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scoped_restores_previous_system() {
        let mut units = Units::new(UnitSystem::Si);
        let inside = units.scoped(UnitSystem::CodeEnglish, |u| u.current());
        assert_eq!(inside, UnitSystem::CodeEnglish);
        assert_eq!(units.current(), UnitSystem::Si);
    }

    #[test]
    fn test_scoped_restores_on_error() {
        let mut units = Units::new(UnitSystem::English);
        let result: PipeResult<()> = units.scoped(UnitSystem::CodeEnglish, |_| {
            Err(PipeError::InvalidInput("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(units.current(), UnitSystem::English);
    }

    #[test]
    fn test_code_english_conversions() {
        let units = Units::new(UnitSystem::CodeEnglish);
        assert_relative_eq!(units.length(0.0254), 1.0, epsilon = 1e-12);
        assert_relative_eq!(units.force(4.448_221_615_260_5), 1.0, epsilon = 1e-12);
        assert_relative_eq!(units.moment(0.112_984_829), 1.0, epsilon = 1e-6);
        assert_relative_eq!(units.stress(6_894.757_293_168), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_unit_system() {
        assert_eq!("code_english".parse::<UnitSystem>().unwrap(), UnitSystem::CodeEnglish);
        assert!("furlongs".parse::<UnitSystem>().is_err());
    }
}
