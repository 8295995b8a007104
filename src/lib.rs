//! pipestress - piping code-check core
//!
//! This library provides the bookkeeping around a piping stress analysis:
//! - A workspace of models with one active model, whose containers give
//!   every point, element, load case, ... a unique name
//! - Stress intensification factors (SIFs) at tees and welded connections
//! - A code-check engine combining load case results by scalar, algebraic,
//!   SRSS, absolute, signed-max and signed-min rules and keeping the
//!   worst-case stress ratio per point
//!
//! Stiffness assembly and solving happen elsewhere; solver results enter
//! through [`loads::ForceTable`].
//!
//! ## Example
//! ```rust
//! use pipestress::prelude::*;
//!
//! # fn main() -> PipeResult<()> {
//! let mut ws = Workspace::new();
//! let mut model = ws.create_model("TEE")?;
//!
//! model.add_section("6in", Section::pipe(0.1683, 0.0071))?;
//! model.add_material("A106B", Material::a106b())?;
//! model.add_code("B31.1", Code::b311(B311::default()))?;
//!
//! let p10 = model.add_point("10", Point::new(0.0, 0.0, 0.0))?;
//! let p20 = model.add_point("20", Point::new(3.0, 0.0, 0.0))?;
//! model.add_run("10-20", p10, p20)?;
//!
//! let pres = model.add_load("P1", Load::pressure(1.0e6))?;
//! let sus = model.add_loadcase("SUS", LoadCase::new(StressType::Sustained).with_loads(&[pres]))?;
//!
//! // forces from the solver, one block of six rows per point
//! model.set_forces(sus, ForceTable::zeros(2, 1))?;
//!
//! let stresses = ws.codecheck(sus)?;
//! assert_eq!(stresses.nrows(), 2);
//! # Ok(())
//! # }
//! ```

pub mod codecheck;
pub mod codes;
pub mod elements;
pub mod entity;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod reports;
pub mod results;
pub mod settings;
pub mod sifs;
pub mod units;
pub mod workspace;

// Re-export common types
pub mod prelude {
    pub use crate::codecheck::CodeCheck;
    pub use crate::codes::{CaseData, Code, CodeFormulas, ElementData, B311};
    pub use crate::elements::{
        Direction, Element, ElementKind, Insulation, Material, Point, Section, Support, SupportKind,
    };
    pub use crate::entity::{Container, EntityKind, Id, Selector};
    pub use crate::error::{ErrorKind, PipeError, PipeResult};
    pub use crate::loads::{Case, CombMethod, ForceTable, Load, LoadCase, LoadComb, StressType};
    pub use crate::model::Model;
    pub use crate::reports::{Report, ReportKind};
    pub use crate::results::{StressMatrix, StressReport, StressRow};
    pub use crate::settings::{CheckOptions, Settings, Vertical};
    pub use crate::sifs::{Sif, SifKind, Topology};
    pub use crate::units::{UnitSystem, Units};
    pub use crate::workspace::{ActiveModel, Workspace};
}
