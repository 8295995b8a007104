//! pipestress example - code check of a 6" tee
//!
//! The solver is not part of this crate, so the nodal forces below stand in
//! for its results.

use anyhow::Result;
use pipestress::math::Vec6;
use pipestress::prelude::*;

const IN: f64 = 0.0254;
const PSI: f64 = 6_894.757_293_168;
const LBF: f64 = 4.448_221_615_260_5;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== pipestress example: 6\" tee ===\n");

    let mut ws = Workspace::new();
    let mut model = ws.create_model_with("TEE", Settings::default().with_units(UnitSystem::CodeEnglish))?;
    model.set_jobname("tee-demo");

    model.add_section("6in-STD", Section::pipe(6.625 * IN, 0.28 * IN).with_corrosion(0.0625 * IN))?;
    model.add_material("A106B", Material::a106b())?;
    model.add_code("B31.1", Code::b311(B311::default()))?;

    //          40
    //          |
    //   10 --- 20 --- 30
    //
    let p10 = model.add_point("10", Point::new(0.0, 0.0, 0.0))?;
    let p20 = model.add_point("20", Point::new(120.0 * IN, 0.0, 0.0))?;
    let p30 = model.add_point("30", Point::new(240.0 * IN, 0.0, 0.0))?;
    let p40 = model.add_point("40", Point::new(120.0 * IN, 60.0 * IN, 0.0))?;

    let e1 = model.add_run("10-20", p10, p20)?;
    let e2 = model.add_run("20-30", p20, p30)?;
    let e3 = model.add_run("20-40", p20, p40)?;

    model.add_support("A10", Support::anchor(p10))?;
    model.add_support("A30", Support::anchor(p30))?;
    model.add_support("Y40", Support::global_y(p40))?;

    // tee at 20 on all three legs
    let tee = model.add_sif("T20", Sif::unreinforced(e1, p20, 6.625 * IN, 0.28 * IN))?;
    model.elements_mut().activate(&[e1, e2, e3])?;
    model.apply_sifs_to_active(&[tee])?;

    let w1 = model.add_load("W1", Load::weight())?;
    let p1 = model.add_load("P1", Load::pressure(600.0 * PSI))?;
    let t1 = model.add_load("T1", Load::thermal(260.0))?;
    model.apply_loads(&[w1, p1, t1], &[e1, e2, e3])?;

    let sus = model.add_loadcase("SUS", LoadCase::new(StressType::Sustained).with_loads(&[w1, p1]))?;
    let exp = model.add_loadcase("EXP", LoadCase::new(StressType::Expansion).with_loads(&[t1]))?;
    let occ = model.add_loadcase("OCC", LoadCase::new(StressType::Occasional).with_loads(&[w1, p1]))?;

    // stand-in solver results: [Fx, Fy, Fz, Mx, My, Mz] per point
    let kip_in = 1000.0 * LBF * IN;
    let forces = |scale: f64| -> Result<ForceTable> {
        let mut table = ForceTable::zeros(4, 1);
        let nodal = [
            [120.0, 0.0, 0.0, 2.0, 18.0, 6.0],
            [-40.0, 0.0, 0.0, 1.0, 42.0, 14.0],
            [-80.0, 0.0, 0.0, 2.0, 15.0, 5.0],
            [0.0, 0.0, 0.0, 0.5, 8.0, 3.0],
        ];
        for (row, f) in nodal.iter().enumerate() {
            let v = Vec6::new(
                scale * f[0] * LBF,
                scale * f[1] * LBF,
                scale * f[2] * LBF,
                scale * f[3] * kip_in,
                scale * f[4] * kip_in,
                scale * f[5] * kip_in,
            );
            table.set_node_forces(row, 0, v)?;
        }
        Ok(table)
    };
    model.set_forces(sus, forces(1.0)?)?;
    model.set_forces(exp, forces(3.5)?)?;
    model.set_forces(occ, forces(1.6)?)?;

    let sus_occ = model.add_loadcomb(
        "SUS+OCC",
        LoadComb::new(StressType::Occasional, CombMethod::Algebraic, &[sus, occ]),
    )?;
    model.precombine(sus_occ)?;
    let env = model.add_loadcomb(
        "ENVELOPE",
        LoadComb::new(StressType::Sustained, CombMethod::SignMax, &[sus, occ]).with_factors(&[1.0, 0.75]),
    )?;
    model.add_report("STRESSES", Report::stresses(&[sus, exp, sus_occ, env]))?;

    println!(
        "Model '{}': {} points, {} elements, {} load cases\n",
        model.jobname().unwrap_or("-"),
        model.points().len(),
        model.elements().len(),
        model.loadcases().len()
    );

    let active = ws.active()?;
    let engine = CodeCheck::new(active);
    let mut units = ws.units().clone();

    for case in [sus, exp, sus_occ, env] {
        let s = engine.check_case(&mut units, case)?;
        let report = engine.report(case, &s)?;

        println!("--- {} ({}) ---", report.case, active.loadcases().get(case)?.stype());
        println!("{:>6} {:>10} {:>10} {:>6} {:>6} {:>10} {:>7}", "Point", "SL", "SAllow", "ii", "io", "Hoop", "Ratio");
        for p in &report.points {
            let s = &p.stress;
            println!(
                "{:>6} {:>10.0} {:>10.0} {:>6.2} {:>6.2} {:>10.0} {:>7.3}{}",
                p.point,
                s.sl,
                s.sallow,
                s.sifi,
                s.sifo,
                s.hoop,
                s.ratio,
                if s.is_overstressed() { "  OVERSTRESSED" } else { "" }
            );
        }
        println!();
    }

    let s = engine.check_case(&mut units, exp)?;
    println!("Expansion report as JSON:\n{}", engine.report(exp, &s)?.to_json()?);

    Ok(())
}
