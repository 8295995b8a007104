//! Points, piping elements and the records they reference

mod element;
mod insulation;
mod material;
mod point;
mod section;
mod support;

pub use element::{Element, ElementKind};
pub use insulation::Insulation;
pub use material::Material;
pub use point::Point;
pub use section::Section;
pub use support::{Direction, Support, SupportKind};
