//! Piping elements - two-point members carrying code assignments

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codes::Code;
use crate::entity::{Entity, EntityKind, Id};
use crate::loads::Load;
use crate::sifs::Sif;

use super::{Insulation, Material, Point, Section};

/// Element type; the extra data is carried for the solver and reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Run,
    /// Bend radius in m
    Bend { radius: f64 },
    /// Valve mass in kg
    Valve { mass: f64 },
    /// Flange mass in kg
    Flange { mass: f64 },
    Rigid,
    /// Outer diameter and thickness at the `to` end, in m
    Reducer { od2: f64, thk2: f64 },
}

/// A piping element between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    /// Start point (node i)
    pub from: Id<Point>,
    /// End point (node j)
    pub to: Id<Point>,
    pub section: Option<Id<Section>>,
    pub material: Option<Id<Material>>,
    pub insulation: Option<Id<Insulation>>,
    pub code: Option<Id<Code>>,

    /// SIFs attached to this element
    pub(crate) sifs: BTreeSet<Id<Sif>>,

    /// Loads applied to this element
    pub(crate) loads: BTreeSet<Id<Load>>,
}

impl Entity for Element {
    const KIND: EntityKind = EntityKind::Element;
}

impl Element {
    /// Create a new element of the given kind
    pub fn new(kind: ElementKind, from: Id<Point>, to: Id<Point>) -> Self {
        Self {
            kind,
            from,
            to,
            section: None,
            material: None,
            insulation: None,
            code: None,
            sifs: BTreeSet::new(),
            loads: BTreeSet::new(),
        }
    }

    /// Straight pipe run
    pub fn run(from: Id<Point>, to: Id<Point>) -> Self {
        Self::new(ElementKind::Run, from, to)
    }

    pub fn bend(from: Id<Point>, to: Id<Point>, radius: f64) -> Self {
        Self::new(ElementKind::Bend { radius }, from, to)
    }

    pub fn valve(from: Id<Point>, to: Id<Point>, mass: f64) -> Self {
        Self::new(ElementKind::Valve { mass }, from, to)
    }

    pub fn flange(from: Id<Point>, to: Id<Point>, mass: f64) -> Self {
        Self::new(ElementKind::Flange { mass }, from, to)
    }

    pub fn rigid(from: Id<Point>, to: Id<Point>) -> Self {
        Self::new(ElementKind::Rigid, from, to)
    }

    pub fn reducer(from: Id<Point>, to: Id<Point>, od2: f64, thk2: f64) -> Self {
        Self::new(ElementKind::Reducer { od2, thk2 }, from, to)
    }

    pub fn with_section(mut self, section: Id<Section>) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_material(mut self, material: Id<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_insulation(mut self, insulation: Id<Insulation>) -> Self {
        self.insulation = Some(insulation);
        self
    }

    pub fn with_code(mut self, code: Id<Code>) -> Self {
        self.code = Some(code);
        self
    }

    /// End points as [i, j]
    pub fn points(&self) -> [Id<Point>; 2] {
        [self.from, self.to]
    }

    pub fn is_end_point(&self, point: Id<Point>) -> bool {
        self.from == point || self.to == point
    }

    /// SIFs attached to this element, in id order
    pub fn sifs(&self) -> impl Iterator<Item = Id<Sif>> + '_ {
        self.sifs.iter().copied()
    }

    pub fn has_sif(&self, sif: Id<Sif>) -> bool {
        self.sifs.contains(&sif)
    }

    /// Loads applied to this element, in id order
    pub fn loads(&self) -> impl Iterator<Item = Id<Load>> + '_ {
        self.loads.iter().copied()
    }

    pub fn has_load(&self, load: Id<Load>) -> bool {
        self.loads.contains(&load)
    }
}
