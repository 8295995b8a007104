//! Stress intensification factors at tee intersections and welded connections
//!
//! A SIF sits on an (element, point) pair. Intersections need a point where
//! exactly three elements meet, connections a point joining exactly two.
//! The variants only differ in the geometry they carry; the intensification
//! values themselves come from the code (see [`crate::codes`]).

use serde::{Deserialize, Serialize};

use crate::elements::{Element, Point};
use crate::entity::{Batch, Container, Entity, EntityKind, Id};
use crate::error::{PipeError, PipeResult};
use crate::model::Geometry;

/// Topological class of a SIF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Tee type intersection of three elements
    Intersection,
    /// Joint between two pipe spools
    Connection,
}

impl Topology {
    /// Number of element edges the SIF point must have
    pub fn required_edges(self) -> usize {
        match self {
            Topology::Intersection => 3,
            Topology::Connection => 2,
        }
    }
}

/// SIF variant and its geometry (lengths in metres)
///
/// `od`/`tn` are the outer diameter and nominal thickness of the run
/// (header) pipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SifKind {
    /// Welding tee per ASME B16.9; `rx` external crotch radius, `tc` crotch thickness
    Welding {
        od: f64,
        tn: f64,
        dob: f64,
        rx: f64,
        tc: f64,
    },
    /// Unreinforced fabricated tee
    Unreinforced { od: f64, tn: f64 },
    /// Reinforced fabricated tee with pad thickness `tr`
    Reinforced { od: f64, tn: f64, tr: f64 },
    /// Olet fitting with welded outlet branch
    Weldolet { od: f64, tn: f64 },
    /// Olet fitting with socket welded outlet branch
    Sockolet { od: f64, tn: f64 },
    /// Contoured integrally reinforced insert with butt-welded branch
    Sweepolet {
        od: f64,
        tn: f64,
        dob: f64,
        rx: f64,
        tc: f64,
    },
    /// Butt welded connection
    ButtWeld,
}

impl SifKind {
    pub fn topology(&self) -> Topology {
        match self {
            SifKind::ButtWeld => Topology::Connection,
            _ => Topology::Intersection,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SifKind::Welding { .. } => "Welding",
            SifKind::Unreinforced { .. } => "Unreinforced",
            SifKind::Reinforced { .. } => "Reinforced",
            SifKind::Weldolet { .. } => "Weldolet",
            SifKind::Sockolet { .. } => "Sockolet",
            SifKind::Sweepolet { .. } => "Sweepolet",
            SifKind::ButtWeld => "ButtWeld",
        }
    }
}

/// A SIF attached to an element at one of its points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sif {
    pub kind: SifKind,
    pub element: Id<Element>,
    pub point: Id<Point>,
}

impl Entity for Sif {
    const KIND: EntityKind = EntityKind::Sif;
}

impl Sif {
    pub fn new(kind: SifKind, element: Id<Element>, point: Id<Point>) -> Self {
        Self {
            kind,
            element,
            point,
        }
    }

    pub fn welding(
        element: Id<Element>,
        point: Id<Point>,
        od: f64,
        tn: f64,
        dob: f64,
        rx: f64,
        tc: f64,
    ) -> Self {
        Self::new(SifKind::Welding { od, tn, dob, rx, tc }, element, point)
    }

    pub fn unreinforced(element: Id<Element>, point: Id<Point>, od: f64, tn: f64) -> Self {
        Self::new(SifKind::Unreinforced { od, tn }, element, point)
    }

    pub fn reinforced(element: Id<Element>, point: Id<Point>, od: f64, tn: f64, tr: f64) -> Self {
        Self::new(SifKind::Reinforced { od, tn, tr }, element, point)
    }

    pub fn weldolet(element: Id<Element>, point: Id<Point>, od: f64, tn: f64) -> Self {
        Self::new(SifKind::Weldolet { od, tn }, element, point)
    }

    pub fn sockolet(element: Id<Element>, point: Id<Point>, od: f64, tn: f64) -> Self {
        Self::new(SifKind::Sockolet { od, tn }, element, point)
    }

    pub fn sweepolet(
        element: Id<Element>,
        point: Id<Point>,
        od: f64,
        tn: f64,
        dob: f64,
        rx: f64,
        tc: f64,
    ) -> Self {
        Self::new(SifKind::Sweepolet { od, tn, dob, rx, tc }, element, point)
    }

    pub fn butt_weld(element: Id<Element>, point: Id<Point>) -> Self {
        Self::new(SifKind::ButtWeld, element, point)
    }

    pub fn topology(&self) -> Topology {
        self.kind.topology()
    }

    /// Check the SIF point against the model topology
    pub fn validate(&self, geometry: &Geometry, point_name: &str) -> PipeResult<()> {
        let expected = self.topology().required_edges();
        let found = geometry.edges(self.point);
        if found != expected {
            return Err(PipeError::InvalidSifPoint {
                sif: self.kind.name().to_string(),
                point: point_name.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }
}

/// Attach every SIF in `sifs` to every element in `targets`
///
/// Attachment is a set union, so applying the same SIF twice is a no-op.
/// All ids are checked before any element is touched.
pub(crate) fn apply(
    registry: &Container<Sif>,
    elements: &mut Container<Element, Batch<Element>>,
    sifs: &[Id<Sif>],
    targets: &[Id<Element>],
) -> PipeResult<()> {
    for sif in sifs {
        registry.get(*sif)?;
    }
    for target in targets {
        elements.get(*target)?;
    }
    for target in targets {
        let element = elements.get_mut(*target)?;
        element.sifs.extend(sifs.iter().copied());
    }
    Ok(())
}
