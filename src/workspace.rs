//! Workspace - the set of open models and the one that is active
//!
//! Entities can only be created through an [`ActiveModel`], the handle
//! returned by [`Workspace::activate`]. Activation is a single assignment
//! behind `&mut Workspace`: every container of the new model becomes the
//! working container at once, including its active selections.

use std::ops::Deref;

use log::{debug, info};

use crate::codecheck::CodeCheck;
use crate::codes::Code;
use crate::elements::{Element, Insulation, Material, Point, Section, Support};
use crate::entity::{Batch, Container, Id, Selector, Single};
use crate::error::{PipeError, PipeResult};
use crate::loads::{Case, ForceTable, Load, LoadCase, LoadComb};
use crate::model::Model;
use crate::reports::Report;
use crate::results::StressMatrix;
use crate::settings::{CheckOptions, Settings};
use crate::sifs::{self, Sif};
use crate::units::{UnitSystem, Units};

/// Open models plus the unit context shared by all of them
#[derive(Debug, Default)]
pub struct Workspace {
    models: Container<Model, Single<Model>>,
    units: Units,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model with default settings and make it active
    pub fn create_model(&mut self, name: &str) -> PipeResult<ActiveModel<'_>> {
        self.create_model_with(name, Settings::default())
    }

    pub fn create_model_with(&mut self, name: &str, settings: Settings) -> PipeResult<ActiveModel<'_>> {
        let id = self.models.insert(name, Model::new(settings))?;
        info!("Created model '{}'", name);
        self.activate(id)
    }

    /// Make `id` the active model and switch to its user units
    pub fn activate(&mut self, id: Id<Model>) -> PipeResult<ActiveModel<'_>> {
        self.models.activate(id)?;
        let model = self.models.get_mut(id)?;
        self.units.set_user_units(model.settings.units);
        info!("Activated model #{} ({} units)", id.raw(), model.settings.units);
        Ok(ActiveModel {
            id,
            model,
            units: &mut self.units,
        })
    }

    pub fn activate_by_name(&mut self, name: &str) -> PipeResult<ActiveModel<'_>> {
        let id = self.models.by_name(name)?;
        self.activate(id)
    }

    pub fn active_id(&self) -> Option<Id<Model>> {
        self.models.active()
    }

    /// The active model, read only
    pub fn active(&self) -> PipeResult<&Model> {
        let id = self.active_id().ok_or(PipeError::NoActiveModel)?;
        self.models.get(id)
    }

    /// Handle to the active model
    pub fn active_mut(&mut self) -> PipeResult<ActiveModel<'_>> {
        let id = self.active_id().ok_or(PipeError::NoActiveModel)?;
        let model = self.models.get_mut(id)?;
        Ok(ActiveModel {
            id,
            model,
            units: &mut self.units,
        })
    }

    /// Close a model; closing the active one leaves no model active and
    /// restores the default units
    pub fn close_model(&mut self, id: Id<Model>) -> PipeResult<Model> {
        let was_active = self.active_id() == Some(id);
        let model = self.models.remove(id)?;
        if was_active {
            self.units = Units::default();
        }
        info!("Closed model #{}", id.raw());
        Ok(model)
    }

    pub fn models(&self) -> &Container<Model, Single<Model>> {
        &self.models
    }

    pub fn units(&self) -> &Units {
        &self.units
    }

    /// Code check every element of the active model for one load case
    pub fn codecheck(&mut self, case: Id<Case>) -> PipeResult<StressMatrix> {
        self.codecheck_with(case, CheckOptions::default())
    }

    pub fn codecheck_with(&mut self, case: Id<Case>, options: CheckOptions) -> PipeResult<StressMatrix> {
        let id = self.active_id().ok_or(PipeError::NoActiveModel)?;
        let model = self.models.get(id)?;
        CodeCheck::new(model)
            .with_options(options)
            .check_case(&mut self.units, case)
    }
}

/// Mutable access to the active model
///
/// Holds the workspace borrow, so no other model can be activated while a
/// handle is alive.
#[derive(Debug)]
pub struct ActiveModel<'w> {
    id: Id<Model>,
    model: &'w mut Model,
    units: &'w mut Units,
}

impl Deref for ActiveModel<'_> {
    type Target = Model;

    fn deref(&self) -> &Model {
        &*self.model
    }
}

impl<'w> ActiveModel<'w> {
    pub fn id(&self) -> Id<Model> {
        self.id
    }

    pub fn units(&self) -> &Units {
        &*self.units
    }

    /// Change the model's user units, effective immediately
    pub fn set_units(&mut self, system: UnitSystem) {
        self.model.settings.units = system;
        self.units.set_user_units(system);
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.model.settings
    }

    pub fn set_jobname(&mut self, jobname: &str) {
        self.model.jobname = Some(jobname.to_string());
    }

    /// Rename or select points; adding and deleting go through the
    /// `add_*`/`delete_*` methods
    pub fn points_mut(&mut self) -> Selector<'_, Point, Single<Point>> {
        Selector::new(&mut self.model.points)
    }

    pub fn elements_mut(&mut self) -> Selector<'_, Element, Batch<Element>> {
        Selector::new(&mut self.model.elements)
    }

    pub fn sections_mut(&mut self) -> Selector<'_, Section, Single<Section>> {
        Selector::new(&mut self.model.sections)
    }

    pub fn materials_mut(&mut self) -> Selector<'_, Material, Single<Material>> {
        Selector::new(&mut self.model.materials)
    }

    pub fn insulation_mut(&mut self) -> Selector<'_, Insulation, Single<Insulation>> {
        Selector::new(&mut self.model.insulation)
    }

    pub fn codes_mut(&mut self) -> Selector<'_, Code, Single<Code>> {
        Selector::new(&mut self.model.codes)
    }

    pub fn reports_mut(&mut self) -> Selector<'_, Report, Single<Report>> {
        Selector::new(&mut self.model.reports)
    }

    /// Add a point and make it the active point
    pub fn add_point(&mut self, name: &str, point: Point) -> PipeResult<Id<Point>> {
        let id = self.model.points.insert(name, point)?;
        self.model.points.activate(id)?;
        Ok(id)
    }

    /// Add an element whose references are all checked against the model
    pub fn add_element(&mut self, name: &str, element: Element) -> PipeResult<Id<Element>> {
        for point in element.points() {
            self.model.points.get(point)?;
        }
        if element.from == element.to {
            return Err(PipeError::InvalidInput(format!(
                "element '{name}' starts and ends at the same point"
            )));
        }
        if let Some(section) = element.section {
            self.model.sections.get(section)?;
        }
        if let Some(material) = element.material {
            self.model.materials.get(material)?;
        }
        if let Some(insulation) = element.insulation {
            self.model.insulation.get(insulation)?;
        }
        if let Some(code) = element.code {
            self.model.codes.get(code)?;
        }
        self.model.elements.insert(name, element)
    }

    /// Add a run from `from` to `to` carrying the active section, material,
    /// insulation and code, then advance the active point to `to`
    pub fn add_run(&mut self, name: &str, from: Id<Point>, to: Id<Point>) -> PipeResult<Id<Element>> {
        let mut element = Element::run(from, to);
        element.section = self.model.sections.active();
        element.material = self.model.materials.active();
        element.insulation = self.model.insulation.active();
        element.code = self.model.codes.active();
        let id = self.add_element(name, element)?;
        self.model.points.activate(to)?;
        Ok(id)
    }

    /// Add a section and make it active
    pub fn add_section(&mut self, name: &str, section: Section) -> PipeResult<Id<Section>> {
        let id = self.model.sections.insert(name, section)?;
        self.model.sections.activate(id)?;
        Ok(id)
    }

    /// Add a material and make it active
    pub fn add_material(&mut self, name: &str, material: Material) -> PipeResult<Id<Material>> {
        let id = self.model.materials.insert(name, material)?;
        self.model.materials.activate(id)?;
        Ok(id)
    }

    /// Add an insulation and make it active
    pub fn add_insulation(&mut self, name: &str, insulation: Insulation) -> PipeResult<Id<Insulation>> {
        let id = self.model.insulation.insert(name, insulation)?;
        self.model.insulation.activate(id)?;
        Ok(id)
    }

    /// Add a code and make it active
    pub fn add_code(&mut self, name: &str, code: Code) -> PipeResult<Id<Code>> {
        let id = self.model.codes.insert(name, code)?;
        self.model.codes.activate(id)?;
        Ok(id)
    }

    pub fn add_support(&mut self, name: &str, support: Support) -> PipeResult<Id<Support>> {
        self.model.points.get(support.point)?;
        self.model.supports.insert(name, support)
    }

    pub fn add_load(&mut self, name: &str, load: Load) -> PipeResult<Id<Load>> {
        self.model.loads.insert(name, load)
    }

    pub fn add_loadcase(&mut self, name: &str, loadcase: LoadCase) -> PipeResult<Id<Case>> {
        for load in &loadcase.loads {
            self.model.loads.get(*load)?;
        }
        if let Some(code) = loadcase.code {
            self.model.codes.get(code)?;
        }
        self.model.loadcases.insert(name, Case::Primary(loadcase))
    }

    /// Add a combination of primary load cases
    pub fn add_loadcomb(&mut self, name: &str, comb: LoadComb) -> PipeResult<Id<Case>> {
        if comb.loadcases.is_empty() {
            return Err(PipeError::EmptyCombination(name.to_string()));
        }
        for case in &comb.loadcases {
            if self.model.loadcases.get(*case)?.as_primary().is_none() {
                return Err(PipeError::InvalidInput(format!(
                    "combination '{name}' refers to '{}', which is not a primary load case",
                    self.model.loadcases.name(*case)?
                )));
            }
        }
        if let Some(code) = comb.code {
            self.model.codes.get(code)?;
        }
        self.model.loadcases.insert(name, Case::Comb(comb))
    }

    /// Add a report and make it active
    pub fn add_report(&mut self, name: &str, report: Report) -> PipeResult<Id<Report>> {
        for case in &report.loadcases {
            self.model.loadcases.get(*case)?;
        }
        let id = self.model.reports.insert(name, report)?;
        self.model.reports.activate(id)?;
        Ok(id)
    }

    /// Register a SIF after checking it against the model topology
    ///
    /// The SIF is not attached to any element yet; see [`Self::apply_sifs`].
    pub fn add_sif(&mut self, name: &str, sif: Sif) -> PipeResult<Id<Sif>> {
        let element = self.model.elements.get(sif.element)?;
        let point_name = self.model.points.name(sif.point)?;
        if !element.is_end_point(sif.point) {
            return Err(PipeError::InvalidInput(format!(
                "point '{point_name}' is not an end point of element '{}'",
                self.model.elements.name(sif.element)?
            )));
        }
        sif.validate(&self.model.geometry(), point_name)?;
        self.model.sifs.insert(name, sif)
    }

    /// Attach `sifs` to each of `elements`
    pub fn apply_sifs(&mut self, sifs: &[Id<Sif>], elements: &[Id<Element>]) -> PipeResult<()> {
        sifs::apply(&self.model.sifs, &mut self.model.elements, sifs, elements)
    }

    /// Attach `sifs` to the active batch of elements
    pub fn apply_sifs_to_active(&mut self, sifs: &[Id<Sif>]) -> PipeResult<()> {
        let targets = self.model.elements.active().to_vec();
        self.apply_sifs(sifs, &targets)
    }

    /// Apply `loads` to each of `elements`; nothing changes on an unknown id
    pub fn apply_loads(&mut self, loads: &[Id<Load>], elements: &[Id<Element>]) -> PipeResult<()> {
        for load in loads {
            self.model.loads.get(*load)?;
        }
        for element in elements {
            self.model.elements.get(*element)?;
        }
        for element in elements {
            self.model.elements.get_mut(*element)?.loads.extend(loads.iter().copied());
        }
        Ok(())
    }

    /// Delete a SIF and detach it from every element
    pub fn delete_sif(&mut self, id: Id<Sif>) -> PipeResult<Sif> {
        let sif = self.model.sifs.remove(id)?;
        for element in self.model.elements.values_mut() {
            element.sifs.remove(&id);
        }
        Ok(sif)
    }

    /// Delete an element together with the SIFs located on it
    pub fn delete_element(&mut self, id: Id<Element>) -> PipeResult<Element> {
        let element = self.model.elements.remove(id)?;
        let orphans: Vec<Id<Sif>> = self
            .model
            .sifs
            .iter()
            .filter(|(_, _, sif)| sif.element == id)
            .map(|(sif, _, _)| sif)
            .collect();
        for sif in orphans {
            self.delete_sif(sif)?;
        }
        Ok(element)
    }

    /// Delete a point that no element or support refers to
    ///
    /// Force tables are laid out by point position, so every stored result
    /// is discarded and the load cases have to be solved again.
    pub fn delete_point(&mut self, id: Id<Point>) -> PipeResult<Point> {
        let name = self.model.points.name(id)?;
        let in_use = self.model.elements.iter().any(|(_, _, el)| el.is_end_point(id))
            || self.model.supports.iter().any(|(_, _, s)| s.point == id);
        if in_use {
            return Err(PipeError::InvalidInput(format!("point '{name}' is still in use")));
        }
        let point = self.model.points.remove(id)?;
        for case in self.model.loadcases.values_mut() {
            case.clear_forces();
        }
        Ok(point)
    }

    /// Store solver results for a load case or combination
    pub fn set_forces(&mut self, case: Id<Case>, forces: ForceTable) -> PipeResult<()> {
        let npoints = self.model.points.len();
        if forces.npoints() < npoints {
            return Err(PipeError::InvalidInput(format!(
                "force table covers {} points, the model has {npoints}",
                forces.npoints()
            )));
        }
        self.model.loadcases.get_mut(case)?.set_forces(forces);
        Ok(())
    }

    /// Build the pre-combined force table of a combination from its
    /// constituents' results
    pub fn precombine(&mut self, comb: Id<Case>) -> PipeResult<()> {
        let name = self.model.loadcases.name(comb)?.to_string();
        let combination = self.model.loadcases.get(comb)?.as_comb().ok_or_else(|| {
            PipeError::InvalidInput(format!("'{name}' is not a load combination"))
        })?;

        let mut parts = Vec::with_capacity(combination.loadcases.len());
        for (factor, case) in combination.constituents() {
            let forces = self
                .model
                .loadcases
                .get(case)?
                .forces()
                .ok_or_else(|| match self.model.loadcases.name(case) {
                    Ok(constituent) => PipeError::NotAnalyzed(constituent.to_string()),
                    Err(err) => err,
                })?;
            parts.push((factor, forces));
        }
        let table = ForceTable::combine(&parts)?;
        debug!("Pre-combined {} load cases into '{}'", parts.len(), name);
        self.model.loadcases.get_mut(comb)?.set_forces(table);
        Ok(())
    }

    /// Code check every element for one load case
    pub fn codecheck(&mut self, case: Id<Case>) -> PipeResult<StressMatrix> {
        CodeCheck::new(&*self.model).check_case(&mut *self.units, case)
    }
}
