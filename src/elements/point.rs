//! Point - a named location where elements meet

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// A structural point in 3D space (coordinates in metres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Entity for Point {
    const KIND: EntityKind = EntityKind::Point;
}

impl Point {
    /// Create a new point at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}
