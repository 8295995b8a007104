//! Support conditions at points

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, Id};

use super::Point;

/// Global direction of a single-DOF restraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    X,
    Y,
    Z,
}

/// How a support restrains its point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SupportKind {
    /// All six DOFs fixed
    Anchor,
    /// Translation restrained along one global axis
    Global(Direction),
    /// Linear spring along one global axis, stiffness in N/m
    Spring { direction: Direction, k: f64 },
    /// Enforced displacement [DX, DY, DZ, RX, RY, RZ]; `None` leaves a DOF free
    Displacement([Option<f64>; 6]),
}

/// A support attached to a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Support {
    pub point: Id<Point>,
    pub kind: SupportKind,
}

impl Entity for Support {
    const KIND: EntityKind = EntityKind::Support;
}

impl Support {
    pub fn anchor(point: Id<Point>) -> Self {
        Self {
            point,
            kind: SupportKind::Anchor,
        }
    }

    pub fn global_x(point: Id<Point>) -> Self {
        Self::global(point, Direction::X)
    }

    pub fn global_y(point: Id<Point>) -> Self {
        Self::global(point, Direction::Y)
    }

    pub fn global_z(point: Id<Point>) -> Self {
        Self::global(point, Direction::Z)
    }

    fn global(point: Id<Point>, direction: Direction) -> Self {
        Self {
            point,
            kind: SupportKind::Global(direction),
        }
    }

    pub fn spring(point: Id<Point>, direction: Direction, k: f64) -> Self {
        Self {
            point,
            kind: SupportKind::Spring { direction, k },
        }
    }

    pub fn displacement(point: Id<Point>, values: [Option<f64>; 6]) -> Self {
        Self {
            point,
            kind: SupportKind::Displacement(values),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_presets() {
        let p = Id::new(4);
        assert!(matches!(Support::anchor(p).kind, SupportKind::Anchor));
        assert!(matches!(Support::global_y(p).kind, SupportKind::Global(Direction::Y)));
        assert_eq!(Support::global_z(p).point, p);
    }

    #[test]
    fn test_displacement_support() {
        let values = [None, Some(-0.01), None, None, None, Some(0.0)];
        let support = Support::displacement(Id::new(3), values);
        match support.kind {
            SupportKind::Displacement(v) => assert_eq!(v, values),
            other => panic!("unexpected support kind {:?}", other),
        }
    }
}
