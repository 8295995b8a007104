//! Loads, load cases, load combinations and their force tables

mod forces;
mod load;
mod load_case;
mod load_comb;

pub use forces::ForceTable;
pub use load::Load;
pub use load_case::{Case, LoadCase, StressType};
pub use load_comb::{CombMethod, LoadComb};
