//! Primary load cases and the case container entry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codes::Code;
use crate::entity::{Entity, EntityKind, Id};
use crate::error::{PipeError, PipeResult};

use super::{ForceTable, Load, LoadComb};

/// Code stress classification of a load case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressType {
    /// Weight and pressure (primary, non self-limiting)
    Sustained,
    /// Sustained plus short duration loads such as wind or seismic
    Occasional,
    /// Thermal expansion range (secondary, self-limiting)
    Expansion,
    /// Hydrostatic test
    Hydro,
    /// Operating; reported but not code checked against a specific limit
    Operating,
}

impl fmt::Display for StressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StressType::Sustained => "sus",
            StressType::Occasional => "occ",
            StressType::Expansion => "exp",
            StressType::Hydro => "hyd",
            StressType::Operating => "ope",
        };
        f.write_str(name)
    }
}

impl FromStr for StressType {
    type Err = PipeError;

    fn from_str(s: &str) -> PipeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sus" | "sustained" => Ok(StressType::Sustained),
            "occ" | "occasional" => Ok(StressType::Occasional),
            "exp" | "expansion" => Ok(StressType::Expansion),
            "hyd" | "hydro" => Ok(StressType::Hydro),
            "ope" | "operating" => Ok(StressType::Operating),
            other => Err(PipeError::UnknownStressType(other.to_string())),
        }
    }
}

/// A primary load case: a set of loads solved together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCase {
    pub stype: StressType,
    /// Code used when an element has none of its own
    pub code: Option<Id<Code>>,
    /// Loads included in this case
    pub loads: Vec<Id<Load>>,

    /// Nodal forces written by the solver
    #[serde(skip)]
    pub(crate) forces: Option<ForceTable>,
}

impl LoadCase {
    /// Create a new load case
    pub fn new(stype: StressType) -> Self {
        Self {
            stype,
            code: None,
            loads: Vec::new(),
            forces: None,
        }
    }

    pub fn with_loads(mut self, loads: &[Id<Load>]) -> Self {
        self.loads.extend_from_slice(loads);
        self
    }

    pub fn with_code(mut self, code: Id<Code>) -> Self {
        self.code = Some(code);
        self
    }

    /// Store the solver results for this case
    pub fn set_forces(&mut self, forces: ForceTable) {
        self.forces = Some(forces);
    }

    pub fn forces(&self) -> Option<&ForceTable> {
        self.forces.as_ref()
    }

    pub fn clear_forces(&mut self) {
        self.forces = None;
    }
}

/// Entry of the load case container: a primary case or a combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Case {
    Primary(LoadCase),
    Comb(LoadComb),
}

impl Entity for Case {
    const KIND: EntityKind = EntityKind::LoadCase;
}

impl Case {
    pub fn stype(&self) -> StressType {
        match self {
            Case::Primary(lc) => lc.stype,
            Case::Comb(comb) => comb.stype,
        }
    }

    pub fn code(&self) -> Option<Id<Code>> {
        match self {
            Case::Primary(lc) => lc.code,
            Case::Comb(comb) => comb.code,
        }
    }

    /// Force results of this entry (pre-combined table for combinations)
    pub fn forces(&self) -> Option<&ForceTable> {
        match self {
            Case::Primary(lc) => lc.forces(),
            Case::Comb(comb) => comb.forces(),
        }
    }

    pub fn set_forces(&mut self, forces: ForceTable) {
        match self {
            Case::Primary(lc) => lc.set_forces(forces),
            Case::Comb(comb) => comb.set_forces(forces),
        }
    }

    /// Forget the stored results
    pub fn clear_forces(&mut self) {
        match self {
            Case::Primary(lc) => lc.clear_forces(),
            Case::Comb(comb) => comb.clear_forces(),
        }
    }

    pub fn as_primary(&self) -> Option<&LoadCase> {
        match self {
            Case::Primary(lc) => Some(lc),
            Case::Comb(_) => None,
        }
    }

    pub fn as_comb(&self) -> Option<&LoadComb> {
        match self {
            Case::Primary(_) => None,
            Case::Comb(comb) => Some(comb),
        }
    }
}

impl From<LoadCase> for Case {
    fn from(lc: LoadCase) -> Self {
        Case::Primary(lc)
    }
}

impl From<LoadComb> for Case {
    fn from(comb: LoadComb) -> Self {
        Case::Comb(comb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stress_type() {
        assert_eq!("sus".parse::<StressType>().unwrap(), StressType::Sustained);
        assert_eq!("Expansion".parse::<StressType>().unwrap(), StressType::Expansion);
        assert!("primary".parse::<StressType>().is_err());
        assert_eq!(StressType::Occasional.to_string(), "occ");
    }

    #[test]
    fn test_case_forces() {
        let mut case = Case::from(LoadCase::new(StressType::Sustained));
        assert!(case.forces().is_none());
        case.set_forces(ForceTable::zeros(2, 1));
        assert_eq!(case.forces().map(|f| f.npoints()), Some(2));
        assert!(case.as_primary().is_some());
        assert!(case.as_comb().is_none());
    }
}
