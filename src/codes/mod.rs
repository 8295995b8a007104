//! Design codes and the stress formulas the code-check engine consumes

mod b311;

pub use b311::B311;

use std::fmt;
use std::sync::Arc;

use crate::elements::{Element, Material, Point, Section};
use crate::entity::{Entity, EntityKind, Id};
use crate::loads::StressType;
use crate::math::Vec6;
use crate::sifs::Sif;
use crate::units::Units;

/// Element data resolved from the model for the formulas
#[derive(Debug, Clone)]
pub struct ElementData<'a> {
    pub name: &'a str,
    pub element: &'a Element,
    pub section: &'a Section,
    pub material: &'a Material,
    /// SIFs attached to the element
    pub sifs: Vec<&'a Sif>,
}

impl<'a> ElementData<'a> {
    /// SIFs located at `point`
    pub fn sifs_at(&self, point: Id<Point>) -> impl Iterator<Item = &'a Sif> + '_ {
        self.sifs.iter().copied().filter(move |sif| sif.point == point)
    }
}

/// Load case data seen by the formulas
///
/// The stress type is passed explicitly so a combination can evaluate an
/// allowable with its own type without touching the constituent case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseData {
    pub stype: StressType,
    /// Design pressure acting on the element, in Pa
    pub pressure: f64,
}

/// Code stress equations
///
/// Implementations are pure and read geometry and forces (SI base units)
/// through `units`, returning values in the unit system currently in force.
/// Force vectors are element end forces [Fx, Fy, Fz, Mx, My, Mz] with x along
/// the element axis, so Mx is torsion and My/Mz are the in-plane and
/// out-of-plane bending moments.
pub trait CodeFormulas {
    /// Short code designation, e.g. "B31.1"
    fn name(&self) -> &str;

    /// Hoop stress
    fn shoop(&self, units: &Units, element: &ElementData, case: &CaseData) -> f64;

    /// Longitudinal pressure stress, the same at both ends
    fn slp(&self, units: &Units, element: &ElementData, case: &CaseData) -> f64;

    /// Axial stress
    fn sax(&self, units: &Units, element: &ElementData, forces: &Vec6) -> f64;

    /// Torsional stress
    fn stor(&self, units: &Units, element: &ElementData, forces: &Vec6) -> f64;

    /// Bending stress at `point`
    fn slb(&self, units: &Units, element: &ElementData, point: Id<Point>, forces: &Vec6) -> f64;

    /// Total longitudinal (code) stress at `point`
    fn sl(
        &self,
        units: &Units,
        element: &ElementData,
        case: &CaseData,
        point: Id<Point>,
        forces: &Vec6,
    ) -> f64;

    /// In-plane SIF at `point`
    fn sifi(&self, element: &ElementData, point: Id<Point>) -> f64;

    /// Out-of-plane SIF at `point`
    fn sifo(&self, element: &ElementData, point: Id<Point>) -> f64;

    /// Allowable stress for the case's stress type
    fn sallow(&self, units: &Units, element: &ElementData, case: &CaseData, forces: &Vec6) -> f64;
}

/// A design code stored in a model
#[derive(Clone)]
pub struct Code {
    formulas: Arc<dyn CodeFormulas + Send + Sync>,
}

impl Entity for Code {
    const KIND: EntityKind = EntityKind::Code;
}

impl Code {
    /// ASME B31.1 power piping
    pub fn b311(code: B311) -> Self {
        Self::custom(code)
    }

    /// Any other formula set
    pub fn custom(formulas: impl CodeFormulas + Send + Sync + 'static) -> Self {
        Self {
            formulas: Arc::new(formulas),
        }
    }

    pub fn formulas(&self) -> &dyn CodeFormulas {
        self.formulas.as_ref()
    }

    pub fn name(&self) -> &str {
        self.formulas.name()
    }
}

impl Default for Code {
    fn default() -> Self {
        Self::b311(B311::default())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Code").field("name", &self.name()).finish()
    }
}
