//! ASME B31.1 power piping stress equations
//!
//! Fitting SIFs are split into in-plane and out-of-plane factors the way
//! B31.3 does it; see [`B311::sif_factors`].

use serde::{Deserialize, Serialize};

use crate::elements::Point;
use crate::entity::Id;
use crate::loads::StressType;
use crate::math::{self, Vec6};
use crate::sifs::SifKind;
use crate::units::Units;

use super::{CaseData, CodeFormulas, ElementData};

/// B31.1 code parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B311 {
    /// Occasional load increase factor on Sh
    pub k: f64,
    /// Cyclic stress range reduction factor
    pub f: f64,
}

impl Default for B311 {
    fn default() -> Self {
        Self { k: 1.15, f: 1.0 }
    }
}

impl B311 {
    pub fn new(k: f64, f: f64) -> Self {
        Self { k, f }
    }

    /// In-plane and out-of-plane SIF of a fitting, both at least 1.0
    ///
    /// The out-of-plane factor is the single B31.1 `i = 0.9 / h^(2/3)`. B31.1
    /// itself has no separate in-plane factor; the split `ii = 0.75 io + 0.25`
    /// follows the B31.3 Appendix D rule, so in-plane bending is intensified
    /// slightly less than B31.1 alone would give.
    pub fn sif_factors(kind: &SifKind) -> (f64, f64) {
        // flexibility characteristic h for each fitting type
        let h = match *kind {
            SifKind::Welding { od, tn, .. } | SifKind::Sweepolet { od, tn, .. } => {
                3.1 * tn / mean_radius(od, tn)
            }
            SifKind::Unreinforced { od, tn } => tn / mean_radius(od, tn),
            SifKind::Reinforced { od, tn, tr } => {
                (tn + tr / 2.0).powf(2.5) / (tn.powf(1.5) * mean_radius(od, tn))
            }
            SifKind::Weldolet { od, tn } | SifKind::Sockolet { od, tn } => {
                3.3 * tn / mean_radius(od, tn)
            }
            SifKind::ButtWeld => return (1.0, 1.0),
        };
        if !h.is_finite() || h <= 0.0 {
            return (1.0, 1.0);
        }
        let io = 0.9 / h.powf(2.0 / 3.0);
        let ii = 0.75 * io + 0.25;
        (ii.max(1.0), io.max(1.0))
    }
}

fn mean_radius(od: f64, tn: f64) -> f64 {
    (od - tn) / 2.0
}

/// (outer diameter, nominal thickness, section modulus, area) in current units
fn section_props(units: &Units, element: &ElementData) -> (f64, f64, f64, f64) {
    let od = units.length(element.section.od);
    let thk = units.length(element.section.thk);
    let z = math::pipe_section_modulus(od, thk);
    let area = math::pipe_area(od, thk);
    (od, thk, z, area)
}

fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

impl CodeFormulas for B311 {
    fn name(&self) -> &str {
        "B31.1"
    }

    fn shoop(&self, units: &Units, element: &ElementData, case: &CaseData) -> f64 {
        let pres = units.stress(case.pressure);
        let od = units.length(element.section.od);
        let t = units.length(element.section.effective_thickness());
        ratio_or_zero(pres * od, 2.0 * t)
    }

    fn slp(&self, units: &Units, element: &ElementData, case: &CaseData) -> f64 {
        let pres = units.stress(case.pressure);
        let (od, thk, _, _) = section_props(units, element);
        ratio_or_zero(pres * od, 4.0 * thk)
    }

    fn sax(&self, units: &Units, element: &ElementData, forces: &Vec6) -> f64 {
        let (_, _, _, area) = section_props(units, element);
        ratio_or_zero(units.force(forces[0]), area)
    }

    fn stor(&self, units: &Units, element: &ElementData, forces: &Vec6) -> f64 {
        let (_, _, z, _) = section_props(units, element);
        ratio_or_zero(units.moment(forces[3]), 2.0 * z)
    }

    fn slb(&self, units: &Units, element: &ElementData, point: Id<Point>, forces: &Vec6) -> f64 {
        let (_, _, z, _) = section_props(units, element);
        let mi = self.sifi(element, point) * units.moment(forces[4]);
        let mo = self.sifo(element, point) * units.moment(forces[5]);
        ratio_or_zero(math::resultant(mi, mo), z)
    }

    fn sl(
        &self,
        units: &Units,
        element: &ElementData,
        case: &CaseData,
        point: Id<Point>,
        forces: &Vec6,
    ) -> f64 {
        let slb = self.slb(units, element, point, forces);
        match case.stype {
            // SE = sqrt(Sb² + 4St²)
            StressType::Expansion => math::resultant(slb, 2.0 * self.stor(units, element, forces)),
            _ => self.slp(units, element, case) + self.sax(units, element, forces).abs() + slb,
        }
    }

    fn sifi(&self, element: &ElementData, point: Id<Point>) -> f64 {
        element
            .sifs_at(point)
            .map(|sif| Self::sif_factors(&sif.kind).0)
            .fold(1.0, f64::max)
    }

    fn sifo(&self, element: &ElementData, point: Id<Point>) -> f64 {
        element
            .sifs_at(point)
            .map(|sif| Self::sif_factors(&sif.kind).1)
            .fold(1.0, f64::max)
    }

    fn sallow(&self, units: &Units, element: &ElementData, case: &CaseData, _forces: &Vec6) -> f64 {
        let sc = units.stress(element.material.sc);
        let sh = units.stress(element.material.sh);
        match case.stype {
            StressType::Sustained | StressType::Hydro | StressType::Operating => sh,
            StressType::Occasional => self.k * sh,
            StressType::Expansion => self.f * (1.25 * sc + 0.25 * sh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Material, Section};
    use crate::sifs::Sif;
    use crate::units::UnitSystem;
    use approx::assert_relative_eq;

    const IN: f64 = 0.0254;
    const PSI: f64 = 6_894.757_293_168;
    const LBF: f64 = 4.448_221_615_260_5;

    fn six_inch() -> (Element, Section, Material) {
        let element = Element::run(Id::new(0), Id::new(1));
        let section = Section::pipe(6.625 * IN, 0.28 * IN);
        let material = Material::new(20_000.0 * PSI, 15_000.0 * PSI);
        (element, section, material)
    }

    fn data<'a>(
        element: &'a Element,
        section: &'a Section,
        material: &'a Material,
        sifs: Vec<&'a Sif>,
    ) -> ElementData<'a> {
        ElementData {
            name: "E1",
            element,
            section,
            material,
            sifs,
        }
    }

    #[test]
    fn test_pressure_stresses() {
        let (el, sec, mat) = six_inch();
        let data = data(&el, &sec, &mat, vec![]);
        let units = Units::new(UnitSystem::CodeEnglish);
        let case = CaseData {
            stype: StressType::Sustained,
            pressure: 100.0 * PSI,
        };
        let code = B311::default();
        assert_relative_eq!(code.shoop(&units, &data, &case), 100.0 * 6.625 / 0.56, epsilon = 1e-6);
        assert_relative_eq!(code.slp(&units, &data, &case), 100.0 * 6.625 / 1.12, epsilon = 1e-6);
    }

    #[test]
    fn test_force_stresses() {
        let (el, sec, mat) = six_inch();
        let data = data(&el, &sec, &mat, vec![]);
        let units = Units::new(UnitSystem::CodeEnglish);
        let code = B311::default();

        let in_lbf = IN * LBF;
        let f = Vec6::new(1000.0 * LBF, 0.0, 0.0, 2000.0 * in_lbf, 3000.0 * in_lbf, 4000.0 * in_lbf);
        let area = math::pipe_area(6.625, 0.28);
        let z = math::pipe_section_modulus(6.625, 0.28);

        assert_relative_eq!(code.sax(&units, &data, &f), 1000.0 / area, epsilon = 1e-6);
        assert_relative_eq!(code.stor(&units, &data, &f), 2000.0 / (2.0 * z), epsilon = 1e-6);
        assert_relative_eq!(code.slb(&units, &data, el.from, &f), 5000.0 / z, epsilon = 1e-6);

        let exp = CaseData {
            stype: StressType::Expansion,
            pressure: 0.0,
        };
        let se = ((5000.0 / z).powi(2) + 4.0 * (1000.0 / z).powi(2)).sqrt();
        assert_relative_eq!(code.sl(&units, &data, &exp, el.from, &f), se, epsilon = 1e-6);
    }

    #[test]
    fn test_allowables() {
        let (el, sec, mat) = six_inch();
        let data = data(&el, &sec, &mat, vec![]);
        let units = Units::new(UnitSystem::CodeEnglish);
        let code = B311::default();
        let f = Vec6::zeros();
        let case = |stype| CaseData {
            stype,
            pressure: 0.0,
        };

        assert_relative_eq!(code.sallow(&units, &data, &case(StressType::Sustained), &f), 15_000.0, epsilon = 1e-6);
        assert_relative_eq!(code.sallow(&units, &data, &case(StressType::Occasional), &f), 17_250.0, epsilon = 1e-6);
        assert_relative_eq!(code.sallow(&units, &data, &case(StressType::Expansion), &f), 28_750.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sif_factors() {
        assert_eq!(B311::sif_factors(&SifKind::ButtWeld), (1.0, 1.0));

        let (ii, io) = B311::sif_factors(&SifKind::Unreinforced {
            od: 6.625 * IN,
            tn: 0.28 * IN,
        });
        assert_relative_eq!(io, 4.540, epsilon = 1e-2);
        assert_relative_eq!(ii, 0.75 * io + 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_sif_only_applies_at_its_point() {
        let (el, sec, mat) = six_inch();
        let tee = Sif::unreinforced(Id::new(0), el.to, 6.625 * IN, 0.28 * IN);
        let data = data(&el, &sec, &mat, vec![&tee]);
        let code = B311::default();
        assert_eq!(code.sifi(&data, el.from), 1.0);
        assert!(code.sifi(&data, el.to) > 1.0);
        assert!(code.sifo(&data, el.to) > code.sifi(&data, el.to));
    }
}
