//! Load-combination code-check engine
//!
//! For each (element, load case) pair the engine derives code stresses at
//! the element's two end points from the case's nodal forces and keeps the
//! worst-case evaluation per point in a [`StressMatrix`].
//!
//! Primary load cases evaluate the code formulas directly. Combinations
//! evaluate every constituent case scaled by its factor and merge the
//! results according to the [`CombMethod`]; `algebraic` combinations instead
//! derive the force dependent stresses from their own pre-combined forces.
//! A combination's allowable is the smallest constituent allowable computed
//! with the combination's stress type.
//!
//! All formulas run with the code unit system in force (see
//! [`Units::scoped`]); the previous system is back in place when the engine
//! returns, error or not.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::codes::{CaseData, CodeFormulas, ElementData};
use crate::elements::{Element, Point};
use crate::entity::{EntityKind, Id};
use crate::error::{PipeError, PipeResult};
use crate::loads::{Case, CombMethod, ForceTable, LoadCase, LoadComb};
use crate::math::Vec6;
use crate::model::Model;
use crate::results::{PointStress, StressMatrix, StressReport, StressRow};
use crate::settings::CheckOptions;
use crate::units::Units;

/// Code-check driver bound to one model
pub struct CodeCheck<'m> {
    model: &'m Model,
    /// Points in result-row order
    points: Vec<Id<Point>>,
    rows: HashMap<Id<Point>, usize>,
    options: CheckOptions,
}

impl<'m> CodeCheck<'m> {
    /// Engine over every point of `model`, rows in point insertion order
    pub fn new(model: &'m Model) -> Self {
        let points: Vec<Id<Point>> = model.points().ids().collect();
        Self::with_points(model, &points)
    }

    /// Engine over an explicit ordered point sequence; a point's position is
    /// its row in both the force tables and the result matrix
    pub fn with_points(model: &'m Model, points: &[Id<Point>]) -> Self {
        let rows = points.iter().enumerate().map(|(row, id)| (*id, row)).collect();
        Self {
            model,
            points: points.to_vec(),
            rows,
            options: CheckOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn npoints(&self) -> usize {
        self.points.len()
    }

    /// A zeroed result matrix sized for this engine
    pub fn new_matrix(&self) -> StressMatrix {
        StressMatrix::new(self.npoints())
    }

    /// Row of `point` in the force tables and the result matrix
    pub fn row(&self, point: Id<Point>) -> PipeResult<usize> {
        self.rows.get(&point).copied().ok_or(PipeError::InvalidId {
            kind: EntityKind::Point,
            id: point.raw(),
        })
    }

    /// Evaluate `element` under `case` and keep the worse of the new and
    /// stored results at both end points
    pub fn evaluate(
        &self,
        units: &mut Units,
        case: Id<Case>,
        element: Id<Element>,
        s: &mut StressMatrix,
    ) -> PipeResult<()> {
        let stresses = self.stresses(units, case, element)?;
        let el = self.model.elements().get(element)?;
        for (point, stress) in el.points().into_iter().zip(stresses.iter()) {
            let row = self.row(point)?;
            if s.update(row, stress)? {
                debug!(
                    "{} row {}: ratio {:.4} from element #{} case #{}",
                    self.model.points().name(point)?,
                    row,
                    stress.ratio,
                    element.raw(),
                    case.raw()
                );
            }
        }
        Ok(())
    }

    /// Code stresses of `element` under `case` at its [from, to] points
    pub fn stresses(&self, units: &mut Units, case: Id<Case>, element: Id<Element>) -> PipeResult<[StressRow; 2]> {
        let name = self.model.elements().name(element)?;
        let el = self.model.elements().get(element)?;
        let data = self.element_data(name, el)?;

        let case_name = self.model.loadcases().name(case)?;
        let entry = self.model.loadcases().get(case)?;
        let code = self.code_for(name, el, entry)?;

        let rows = [self.row(el.from)?, self.row(el.to)?];
        let stresses = units.scoped(self.options.code_units, |units| match entry {
            Case::Primary(lc) => self.primary(units, code, &data, lc, case_name, rows),
            Case::Comb(comb) => self.combination(units, code, &data, comb, case_name, rows),
        })?;

        if self.options.log {
            info!(
                "{} / {}: ratio {:.4} at i, {:.4} at j",
                name, case_name, stresses[0].ratio, stresses[1].ratio
            );
        }
        Ok(stresses)
    }

    /// Run every element of the model through one load case
    pub fn check_case(&self, units: &mut Units, case: Id<Case>) -> PipeResult<StressMatrix> {
        let mut s = self.new_matrix();
        for element in self.model.elements().ids() {
            self.evaluate(units, case, element, &mut s)?;
        }
        Ok(s)
    }

    /// Named per-point rows of a filled matrix
    pub fn report(&self, case: Id<Case>, s: &StressMatrix) -> PipeResult<StressReport> {
        let mut points = Vec::with_capacity(self.npoints());
        for (row, point) in self.points.iter().enumerate() {
            let stress = s.row(row).ok_or_else(|| {
                PipeError::InvalidInput(format!("stress matrix has no row {row}"))
            })?;
            points.push(PointStress {
                point: self.model.points().name(*point)?.to_string(),
                stress,
            });
        }
        Ok(StressReport {
            case: self.model.loadcases().name(case)?.to_string(),
            code_units: self.options.code_units.to_string(),
            points,
        })
    }

    fn element_data<'a>(&'a self, name: &'a str, element: &'a Element) -> PipeResult<ElementData<'a>> {
        let section = element.section.ok_or_else(|| PipeError::MissingProperty {
            element: name.to_string(),
            property: "section",
        })?;
        let material = element.material.ok_or_else(|| PipeError::MissingProperty {
            element: name.to_string(),
            property: "material",
        })?;
        let sifs = element
            .sifs()
            .map(|id| self.model.sifs().get(id))
            .collect::<PipeResult<Vec<_>>>()?;
        Ok(ElementData {
            name,
            element,
            section: self.model.sections().get(section)?,
            material: self.model.materials().get(material)?,
            sifs,
        })
    }

    /// The element's own code, else the one assigned to the case
    fn code_for(&self, name: &str, element: &Element, case: &Case) -> PipeResult<&'m dyn CodeFormulas> {
        let id = element.code.or(case.code()).ok_or_else(|| PipeError::MissingProperty {
            element: name.to_string(),
            property: "code",
        })?;
        Ok(self.model.codes().get(id)?.formulas())
    }

    fn node_forces(&self, table: &ForceTable, row: usize, case_name: &str) -> PipeResult<Vec6> {
        table.node_forces(row, self.options.column).ok_or_else(|| {
            PipeError::InvalidInput(format!(
                "load case '{case_name}' has no forces for point row {row}, column {}",
                self.options.column
            ))
        })
    }

    fn primary(
        &self,
        units: &Units,
        code: &dyn CodeFormulas,
        data: &ElementData,
        lc: &LoadCase,
        case_name: &str,
        rows: [usize; 2],
    ) -> PipeResult<[StressRow; 2]> {
        let table = lc.forces().ok_or_else(|| PipeError::NotAnalyzed(case_name.to_string()))?;
        let case = CaseData {
            stype: lc.stype,
            pressure: self.model.pressure(data.element, lc),
        };
        let points = data.element.points();

        let mut out = [StressRow::default(); 2];
        for k in 0..2 {
            let forces = self.node_forces(table, rows[k], case_name)?;
            let mut row = node_stress(units, code, data, &case, points[k], &forces);
            row.sallow = code.sallow(units, data, &case, &forces);
            row.ratio = ratio(row.sl, row.sallow, data.name, case_name);
            out[k] = row;
        }
        Ok(out)
    }

    fn combination(
        &self,
        units: &Units,
        code: &dyn CodeFormulas,
        data: &ElementData,
        comb: &LoadComb,
        comb_name: &str,
        rows: [usize; 2],
    ) -> PipeResult<[StressRow; 2]> {
        if comb.loadcases.is_empty() {
            return Err(PipeError::EmptyCombination(comb_name.to_string()));
        }
        let points = data.element.points();

        // per node: factored constituent stresses and constituent allowables
        let mut parts: [Vec<StressRow>; 2] = [Vec::new(), Vec::new()];
        let mut allowables: [Vec<f64>; 2] = [Vec::new(), Vec::new()];
        let mut pressure = 0.0;

        for (factor, id) in comb.constituents() {
            let name = self.model.loadcases().name(id)?;
            let lc = self.model.loadcases().get(id)?.as_primary().ok_or_else(|| {
                PipeError::InvalidInput(format!(
                    "combination '{comb_name}' refers to '{name}', which is not a primary load case"
                ))
            })?;
            let table = lc.forces().ok_or_else(|| PipeError::NotAnalyzed(name.to_string()))?;
            let case = CaseData {
                stype: lc.stype,
                pressure: self.model.pressure(data.element, lc),
            };
            // constituent forces checked against the combination's stress type
            let retyped = CaseData {
                stype: comb.stype,
                ..case
            };
            pressure += factor * case.pressure;

            for k in 0..2 {
                let forces = self.node_forces(table, rows[k], name)?;
                parts[k].push(scaled(node_stress(units, code, data, &case, points[k], &forces), factor));
                allowables[k].push(code.sallow(units, data, &retyped, &forces));
            }
        }

        let mut out = [StressRow::default(); 2];
        for k in 0..2 {
            let mut row = combine(comb.method, &parts[k]);
            if comb.method == CombMethod::Algebraic {
                let table = comb
                    .forces()
                    .ok_or_else(|| PipeError::NotAnalyzed(comb_name.to_string()))?;
                let forces = self.node_forces(table, rows[k], comb_name)?;
                let case = CaseData {
                    stype: comb.stype,
                    pressure,
                };
                let derived = node_stress(units, code, data, &case, points[k], &forces);
                row.axial = derived.axial;
                row.torsion = derived.torsion;
                row.bending = derived.bending;
                row.sl = derived.sl;
            }
            row.sifi = code.sifi(data, points[k]);
            row.sifo = code.sifo(data, points[k]);
            row.sallow = allowables[k].iter().copied().fold(f64::INFINITY, f64::min);
            row.ratio = ratio(row.sl, row.sallow, data.name, comb_name);
            out[k] = row;
        }
        Ok(out)
    }
}

/// Stresses and SIFs at one end point; allowable and ratio are left at zero
fn node_stress(
    units: &Units,
    code: &dyn CodeFormulas,
    data: &ElementData,
    case: &CaseData,
    point: Id<Point>,
    forces: &Vec6,
) -> StressRow {
    StressRow {
        hoop: code.shoop(units, data, case),
        axial: code.sax(units, data, forces),
        torsion: code.stor(units, data, forces),
        slp: code.slp(units, data, case),
        bending: code.slb(units, data, point, forces),
        sl: code.sl(units, data, case, point, forces),
        sifi: code.sifi(data, point),
        sifo: code.sifo(data, point),
        ..StressRow::default()
    }
}

/// Stress components multiplied by a combination factor; SIFs are geometric
/// and stay as they are
fn scaled(row: StressRow, factor: f64) -> StressRow {
    StressRow {
        hoop: factor * row.hoop,
        axial: factor * row.axial,
        torsion: factor * row.torsion,
        slp: factor * row.slp,
        bending: factor * row.bending,
        sl: factor * row.sl,
        ..row
    }
}

/// Merge constituent stresses component by component
fn combine(method: CombMethod, parts: &[StressRow]) -> StressRow {
    let merge = |component: fn(&StressRow) -> f64| {
        let values: Vec<f64> = parts.iter().map(component).collect();
        method.combine(&values)
    };
    let mut row = StressRow {
        hoop: merge(|r| r.hoop),
        axial: merge(|r| r.axial),
        torsion: merge(|r| r.torsion),
        slp: merge(|r| r.slp),
        bending: merge(|r| r.bending),
        sl: merge(|r| r.sl),
        ..StressRow::default()
    };
    if method == CombMethod::Algebraic {
        // pressure stresses are summed; the rest is rederived from forces
        row.axial = 0.0;
        row.torsion = 0.0;
        row.bending = 0.0;
        row.sl = 0.0;
    }
    row
}

/// sl / sallow, with a zero allowable giving a zero ratio
fn ratio(sl: f64, sallow: f64, element: &str, case: &str) -> f64 {
    if sallow == 0.0 {
        warn!("Zero allowable stress for element '{}' in '{}', ratio set to 0", element, case);
        return 0.0;
    }
    sl / sallow
}
