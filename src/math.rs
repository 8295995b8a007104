//! Numeric aliases and small helpers shared by the code formulas

use nalgebra::{DMatrix, SVector};

use std::f64::consts::PI;

pub type Mat = DMatrix<f64>;

/// Six nodal force components [Fx, Fy, Fz, Mx, My, Mz]
pub type Vec6 = SVector<f64, 6>;

/// Degrees of freedom per point
pub const NDOF: usize = 6;

/// Metal area of a pipe cross-section
pub fn pipe_area(od: f64, thk: f64) -> f64 {
    let id = od - 2.0 * thk;
    PI / 4.0 * (od * od - id * id)
}

/// Elastic section modulus of a pipe cross-section
pub fn pipe_section_modulus(od: f64, thk: f64) -> f64 {
    let id = od - 2.0 * thk;
    let inertia = PI / 64.0 * (od.powi(4) - id.powi(4));
    inertia / (od / 2.0)
}

/// Resultant of two orthogonal components
pub fn resultant(a: f64, b: f64) -> f64 {
    a.hypot(b)
}
