//! Model - the aggregate root owning one container per entity kind

use std::collections::HashMap;

use crate::codes::Code;
use crate::elements::{Element, Insulation, Material, Point, Section, Support};
use crate::entity::{Batch, Container, Entity, EntityKind, Id, Single};
use crate::loads::{Case, Load, LoadCase};
use crate::reports::Report;
use crate::settings::Settings;
use crate::sifs::Sif;

/// Topology of a model: how many element edges meet at each point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    edges: HashMap<Id<Point>, usize>,
}

impl Geometry {
    /// Build the topology from a set of elements
    pub fn from_elements<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Self {
        let mut edges: HashMap<Id<Point>, usize> = HashMap::new();
        for element in elements {
            for point in element.points() {
                *edges.entry(point).or_default() += 1;
            }
        }
        Self { edges }
    }

    /// Number of elements meeting at `point`
    pub fn edges(&self, point: Id<Point>) -> usize {
        self.edges.get(&point).copied().unwrap_or(0)
    }
}

/// A piping model
///
/// Containers are only reachable mutably through an
/// [`ActiveModel`](crate::workspace::ActiveModel), so nothing can be created
/// in a model that is not active.
#[derive(Debug, Default)]
pub struct Model {
    pub(crate) settings: Settings,
    pub(crate) jobname: Option<String>,

    pub(crate) points: Container<Point, Single<Point>>,
    pub(crate) elements: Container<Element, Batch<Element>>,
    pub(crate) sections: Container<Section, Single<Section>>,
    pub(crate) materials: Container<Material, Single<Material>>,
    pub(crate) insulation: Container<Insulation, Single<Insulation>>,
    pub(crate) codes: Container<Code, Single<Code>>,
    pub(crate) sifs: Container<Sif>,
    pub(crate) supports: Container<Support>,
    pub(crate) loads: Container<Load>,
    pub(crate) loadcases: Container<Case>,
    pub(crate) reports: Container<Report, Single<Report>>,
}

impl Entity for Model {
    const KIND: EntityKind = EntityKind::Model;
}

impl Model {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn jobname(&self) -> Option<&str> {
        self.jobname.as_deref()
    }

    pub fn points(&self) -> &Container<Point, Single<Point>> {
        &self.points
    }

    pub fn elements(&self) -> &Container<Element, Batch<Element>> {
        &self.elements
    }

    pub fn sections(&self) -> &Container<Section, Single<Section>> {
        &self.sections
    }

    pub fn materials(&self) -> &Container<Material, Single<Material>> {
        &self.materials
    }

    pub fn insulation(&self) -> &Container<Insulation, Single<Insulation>> {
        &self.insulation
    }

    pub fn codes(&self) -> &Container<Code, Single<Code>> {
        &self.codes
    }

    pub fn sifs(&self) -> &Container<Sif> {
        &self.sifs
    }

    pub fn supports(&self) -> &Container<Support> {
        &self.supports
    }

    pub fn loads(&self) -> &Container<Load> {
        &self.loads
    }

    pub fn loadcases(&self) -> &Container<Case> {
        &self.loadcases
    }

    pub fn reports(&self) -> &Container<Report, Single<Report>> {
        &self.reports
    }

    /// Current topology derived from the elements
    pub fn geometry(&self) -> Geometry {
        Geometry::from_elements(self.elements.iter().map(|(_, _, element)| element))
    }

    /// Design pressure on `element` in `case`: the sum of the pressure loads
    /// that are both applied to the element and included in the case
    pub fn pressure(&self, element: &Element, case: &LoadCase) -> f64 {
        case.loads
            .iter()
            .filter(|id| element.has_load(**id))
            .filter_map(|id| self.loads.get(*id).ok())
            .filter_map(Load::as_pressure)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::StressType;

    #[test]
    fn test_geometry_counts_edges() {
        let p = [Id::new(0), Id::new(1), Id::new(2), Id::new(3)];
        let elements = [
            Element::run(p[0], p[1]),
            Element::run(p[1], p[2]),
            Element::run(p[1], p[3]),
        ];
        let geometry = Geometry::from_elements(elements.iter());
        assert_eq!(geometry.edges(p[0]), 1);
        assert_eq!(geometry.edges(p[1]), 3);
        assert_eq!(geometry.edges(Id::new(42)), 0);
    }

    #[test]
    fn test_pressure_needs_load_on_element_and_case() {
        let mut model = Model::new(Settings::default());
        let p1 = model.loads.insert("P1", Load::pressure(1.0e6)).unwrap();
        let p2 = model.loads.insert("P2", Load::pressure(2.0e6)).unwrap();
        let w = model.loads.insert("W1", Load::weight()).unwrap();

        let mut element = Element::run(Id::new(0), Id::new(1));
        element.loads.extend([p1, w]);

        let case = LoadCase::new(StressType::Sustained).with_loads(&[p1, p2, w]);
        assert_eq!(model.pressure(&element, &case), 1.0e6);

        let other = LoadCase::new(StressType::Sustained).with_loads(&[p2]);
        assert_eq!(model.pressure(&element, &other), 0.0);
    }
}
