//! Load combinations and their combination rules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codes::Code;
use crate::entity::Id;
use crate::error::{PipeError, PipeResult};

use super::{Case, ForceTable, StressType};

/// How per-case code stresses are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombMethod {
    /// Sum of factored stresses
    Scalar,
    /// Forces are combined first, stresses derived from the combined forces
    Algebraic,
    /// Square root of the sum of squares
    Srss,
    /// Sum of absolute values
    Abs,
    /// Signed maximum
    SignMax,
    /// Signed minimum
    SignMin,
}

impl CombMethod {
    /// Combine per-case values into one; `values` must not be empty
    pub fn combine(self, values: &[f64]) -> f64 {
        match self {
            CombMethod::Scalar | CombMethod::Algebraic => values.iter().sum(),
            // the sign of a factor is lost on squaring
            CombMethod::Srss => values.iter().map(|v| v * v).sum::<f64>().sqrt(),
            CombMethod::Abs => values.iter().map(|v| v.abs()).sum(),
            CombMethod::SignMax => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            CombMethod::SignMin => values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

impl fmt::Display for CombMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CombMethod::Scalar => "scalar",
            CombMethod::Algebraic => "algebraic",
            CombMethod::Srss => "srss",
            CombMethod::Abs => "abs",
            CombMethod::SignMax => "signmax",
            CombMethod::SignMin => "signmin",
        };
        f.write_str(name)
    }
}

impl FromStr for CombMethod {
    type Err = PipeError;

    fn from_str(s: &str) -> PipeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(CombMethod::Scalar),
            "algebraic" => Ok(CombMethod::Algebraic),
            "srss" => Ok(CombMethod::Srss),
            "abs" => Ok(CombMethod::Abs),
            "signmax" => Ok(CombMethod::SignMax),
            "signmin" => Ok(CombMethod::SignMin),
            other => Err(PipeError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A derived load case built from primary load cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadComb {
    pub stype: StressType,
    pub method: CombMethod,
    /// Constituent primary load cases, in order
    pub loadcases: Vec<Id<Case>>,
    /// Factors parallel to `loadcases`; missing entries count as 1.0
    pub factors: Vec<f64>,
    pub code: Option<Id<Code>>,

    /// Pre-combined forces, required by the algebraic method
    #[serde(skip)]
    pub(crate) forces: Option<ForceTable>,
}

impl LoadComb {
    /// Create a new load combination with unit factors
    pub fn new(stype: StressType, method: CombMethod, loadcases: &[Id<Case>]) -> Self {
        Self {
            stype,
            method,
            loadcases: loadcases.to_vec(),
            factors: Vec::new(),
            code: None,
            forces: None,
        }
    }

    pub fn with_factors(mut self, factors: &[f64]) -> Self {
        self.factors = factors.to_vec();
        self
    }

    pub fn with_code(mut self, code: Id<Code>) -> Self {
        self.code = Some(code);
        self
    }

    /// Factor of the `index`-th constituent
    pub fn factor(&self, index: usize) -> f64 {
        self.factors.get(index).copied().unwrap_or(1.0)
    }

    /// `(factor, load case)` pairs; extra factors beyond the case list are ignored
    pub fn constituents(&self) -> impl Iterator<Item = (f64, Id<Case>)> + '_ {
        self.loadcases
            .iter()
            .enumerate()
            .map(|(i, case)| (self.factor(i), *case))
    }

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
