//! End-to-end checks of the registry, SIF and code-check behaviour

use approx::assert_relative_eq;
use pipestress::math::Vec6;
use pipestress::prelude::*;

/// Linear test code: sl = Fx + My, allowable fixed per stress type unless
/// the case carries a nonzero Fy, which is then taken as the allowable
struct LinearCode {
    allow: f64,
}

impl CodeFormulas for LinearCode {
    fn name(&self) -> &str {
        "linear"
    }

    fn shoop(&self, _units: &Units, _element: &ElementData, case: &CaseData) -> f64 {
        case.pressure
    }

    fn slp(&self, _units: &Units, _element: &ElementData, case: &CaseData) -> f64 {
        case.pressure / 2.0
    }

    fn sax(&self, _units: &Units, _element: &ElementData, forces: &Vec6) -> f64 {
        forces[0]
    }

    fn stor(&self, _units: &Units, _element: &ElementData, forces: &Vec6) -> f64 {
        forces[3]
    }

    fn slb(&self, _units: &Units, _element: &ElementData, _point: Id<Point>, forces: &Vec6) -> f64 {
        forces[4]
    }

    fn sl(&self, _units: &Units, _element: &ElementData, _case: &CaseData, _point: Id<Point>, forces: &Vec6) -> f64 {
        forces[0] + forces[4]
    }

    fn sifi(&self, _element: &ElementData, _point: Id<Point>) -> f64 {
        1.0
    }

    fn sifo(&self, _element: &ElementData, _point: Id<Point>) -> f64 {
        1.0
    }

    fn sallow(&self, _units: &Units, _element: &ElementData, case: &CaseData, forces: &Vec6) -> f64 {
        if forces[1] != 0.0 {
            return forces[1];
        }
        match case.stype {
            StressType::Expansion => 3.0 * self.allow,
            _ => self.allow,
        }
    }
}

struct Line {
    ws: Workspace,
    elements: Vec<Id<Element>>,
    cases: Vec<Id<Case>>,
}

/// P1 - P2 - P3 - P4 plus an unconnected P5; case `k` puts `sl[k][row]` at each row
fn line_model(allow: f64, sl: &[[f64; 5]]) -> Line {
    let mut ws = Workspace::new();
    let mut m = ws.create_model("LINE").unwrap();
    m.add_section("S", Section::pipe(0.1143, 0.006)).unwrap();
    m.add_material("M", Material::a106b()).unwrap();
    m.add_code("C", Code::custom(LinearCode { allow })).unwrap();

    let points: Vec<Id<Point>> = (0..5)
        .map(|i| m.add_point(&format!("P{}", i + 1), Point::new(i as f64, 0.0, 0.0)).unwrap())
        .collect();
    let elements = (0..3)
        .map(|i| m.add_run(&format!("E{}", i + 1), points[i], points[i + 1]).unwrap())
        .collect();

    let mut cases = Vec::new();
    for (k, values) in sl.iter().enumerate() {
        let stype = if k % 2 == 0 { StressType::Sustained } else { StressType::Expansion };
        let case = m.add_loadcase(&format!("L{}", k + 1), LoadCase::new(stype)).unwrap();
        let mut table = ForceTable::zeros(5, 1);
        for (row, v) in values.iter().enumerate() {
            table.set_node_forces(row, 0, Vec6::new(*v, 0.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
        }
        m.set_forces(case, table).unwrap();
        cases.push(case);
    }
    Line { ws, elements, cases }
}

#[test]
fn untouched_points_keep_zero_rows() {
    let line = line_model(100.0, &[[10.0, 20.0, 30.0, 40.0, 999.0]]);
    let model = line.ws.active().unwrap();
    let engine = CodeCheck::new(model);
    let mut units = Units::default();
    let mut s = engine.new_matrix();

    engine.evaluate(&mut units, line.cases[0], line.elements[0], &mut s).unwrap();
    for row in 2..5 {
        assert_eq!(s.row(row), Some(StressRow::default()));
    }

    let s = engine.check_case(&mut units, line.cases[0]).unwrap();
    assert_eq!(s.ratio(4), Some(0.0));
    assert_relative_eq!(s.ratio(3).unwrap(), 0.4);
}

#[test]
fn final_matrix_is_order_independent() {
    let line = line_model(
        100.0,
        &[
            [10.0, 80.0, 30.0, 5.0, 0.0],
            [60.0, 20.0, 60.0, 150.0, 0.0],
            [-40.0, 95.0, 10.0, 70.0, 0.0],
        ],
    );
    let model = line.ws.active().unwrap();
    let engine = CodeCheck::new(model);
    let mut units = Units::default();

    let mut calls = Vec::new();
    for case in &line.cases {
        for element in &line.elements {
            calls.push((*case, *element));
        }
    }

    let mut forward = engine.new_matrix();
    for (case, element) in &calls {
        engine.evaluate(&mut units, *case, *element, &mut forward).unwrap();
    }
    let mut backward = engine.new_matrix();
    for (case, element) in calls.iter().rev() {
        engine.evaluate(&mut units, *case, *element, &mut backward).unwrap();
    }
    let mut interleaved = engine.new_matrix();
    for (case, element) in calls.iter().step_by(2).chain(calls.iter().skip(1).step_by(2)) {
        engine.evaluate(&mut units, *case, *element, &mut interleaved).unwrap();
    }

    assert_eq!(forward, backward);
    assert_eq!(forward, interleaved);

    // stored ratio is the maximum over every evaluation touching the point
    assert_relative_eq!(forward.ratio(0).unwrap(), 0.2);
    assert_relative_eq!(forward.ratio(1).unwrap(), 0.95);
    assert_relative_eq!(forward.ratio(2).unwrap(), 0.3);
    assert_relative_eq!(forward.ratio(3).unwrap(), 0.7);
}

#[test]
fn zero_allowable_gives_zero_ratio() {
    let line = line_model(0.0, &[[10.0, 20.0, 30.0, 40.0, 0.0]]);
    let mut ws = line.ws;
    let s = ws.codecheck(line.cases[0]).unwrap();
    for row in 0..5 {
        assert_eq!(s.ratio(row), Some(0.0));
    }
}

#[test]
fn srss_discards_sign() {
    for (a, b) in [(3.0, 4.0), (-3.0, 4.0), (3.0, -4.0), (-3.0, -4.0)] {
        let line = line_model(100.0, &[[a, 0.0, 0.0, 0.0, 0.0], [b, 0.0, 0.0, 0.0, 0.0]]);
        let mut ws = line.ws;
        let comb = ws
            .active_mut()
            .unwrap()
            .add_loadcomb("SRSS", LoadComb::new(StressType::Sustained, CombMethod::Srss, &line.cases))
            .unwrap();

        let engine = CodeCheck::new(ws.active().unwrap());
        let [i, _] = engine.stresses(&mut Units::default(), comb, line.elements[0]).unwrap();
        assert_relative_eq!(i.sl, 5.0);
        assert_relative_eq!(i.axial, 5.0);
    }
}

#[test]
fn signed_extremes() {
    let line = line_model(
        100.0,
        &[
            [3.0, 0.0, 0.0, 0.0, 0.0],
            [-7.0, 0.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0, 0.0],
        ],
    );
    let mut ws = line.ws;
    let (max, min) = {
        let mut m = ws.active_mut().unwrap();
        let max = m
            .add_loadcomb("MAX", LoadComb::new(StressType::Sustained, CombMethod::SignMax, &line.cases))
            .unwrap();
        let min = m
            .add_loadcomb("MIN", LoadComb::new(StressType::Sustained, CombMethod::SignMin, &line.cases))
            .unwrap();
        (max, min)
    };

    let engine = CodeCheck::new(ws.active().unwrap());
    let mut units = Units::default();
    assert_eq!(engine.stresses(&mut units, max, line.elements[0]).unwrap()[0].sl, 3.0);
    assert_eq!(engine.stresses(&mut units, min, line.elements[0]).unwrap()[0].sl, -7.0);
}

#[test]
fn combination_allowable_is_smallest_constituent() {
    // L1 sustained, L2 expansion; the combination checks both as sustained
    let line = line_model(100.0, &[[50.0, 0.0, 0.0, 0.0, 0.0], [50.0, 0.0, 0.0, 0.0, 0.0]]);
    let mut ws = line.ws;
    let comb = ws
        .active_mut()
        .unwrap()
        .add_loadcomb("ABS", LoadComb::new(StressType::Sustained, CombMethod::Abs, &line.cases))
        .unwrap();
    let engine = CodeCheck::new(ws.active().unwrap());
    let [i, _] = engine.stresses(&mut Units::default(), comb, line.elements[0]).unwrap();
    assert_eq!(i.sallow, 100.0);
    assert_relative_eq!(i.ratio, 1.0);
    assert!(i.is_overstressed());

    let l2 = ws.active().unwrap().loadcases().get(line.cases[1]).unwrap();
    assert_eq!(l2.stype(), StressType::Expansion);
}

#[test]
fn combination_takes_lowest_allowable_whatever_the_order() {
    let line = line_model(100.0, &[[0.0; 5], [0.0; 5]]);
    let mut ws = line.ws;
    let comb = {
        let mut m = ws.active_mut().unwrap();
        // same stress type after retyping, different allowables: 120 then 80
        for (case, fy) in line.cases.iter().zip([120.0, 80.0]) {
            let mut table = ForceTable::zeros(5, 1);
            for row in 0..5 {
                table.set_node_forces(row, 0, Vec6::new(40.0, fy, 0.0, 0.0, 0.0, 0.0)).unwrap();
            }
            m.set_forces(*case, table).unwrap();
        }
        m.add_loadcomb("SCALAR", LoadComb::new(StressType::Sustained, CombMethod::Scalar, &line.cases))
            .unwrap()
    };

    let engine = CodeCheck::new(ws.active().unwrap());
    let [i, j] = engine.stresses(&mut Units::default(), comb, line.elements[0]).unwrap();
    assert_eq!(i.sallow, 80.0);
    assert_eq!(j.sallow, 80.0);
    assert_relative_eq!(i.ratio, 1.0);
}

#[test]
fn deleting_a_point_requires_new_results() {
    let mut ws = Workspace::new();
    let mut m = ws.create_model("SHIFT").unwrap();
    m.add_section("S", Section::pipe(0.1143, 0.006)).unwrap();
    m.add_material("M", Material::a106b()).unwrap();
    m.add_code("C", Code::custom(LinearCode { allow: 100.0 })).unwrap();

    let p1 = m.add_point("P1", Point::new(0.0, 0.0, 0.0)).unwrap();
    let p9 = m.add_point("P9", Point::new(5.0, 5.0, 0.0)).unwrap();
    let p2 = m.add_point("P2", Point::new(1.0, 0.0, 0.0)).unwrap();
    let e1 = m.add_run("E1", p1, p2).unwrap();

    let case = m.add_loadcase("L1", LoadCase::new(StressType::Sustained)).unwrap();
    let mut table = ForceTable::zeros(3, 1);
    for (row, fx) in [10.0, 99.0, 20.0].into_iter().enumerate() {
        table.set_node_forces(row, 0, Vec6::new(fx, 0.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
    }
    m.set_forces(case, table).unwrap();

    {
        let engine = CodeCheck::new(&m);
        let [_, at_p2] = engine.stresses(&mut Units::default(), case, e1).unwrap();
        assert_eq!(at_p2.sl, 20.0);
    }

    m.delete_point(p9).unwrap();
    let engine = CodeCheck::new(&m);
    let err = engine.stresses(&mut Units::default(), case, e1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Analysis);
    assert!(matches!(err, PipeError::NotAnalyzed(_)));
}

#[test]
fn duplicate_name_per_model() {
    let mut ws = Workspace::new();
    {
        let mut a = ws.create_model("A").unwrap();
        a.add_point("P1", Point::default()).unwrap();
        let err = a.add_point("P1", Point::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Identity);
    }
    let mut b = ws.create_model("B").unwrap();
    b.add_point("P1", Point::default()).unwrap();
}

#[test]
fn activation_exposes_only_active_points() {
    let mut ws = Workspace::new();
    let a = {
        let mut m = ws.create_model("A").unwrap();
        m.add_point("A1", Point::default()).unwrap();
        m.add_point("A2", Point::default()).unwrap();
        m.id()
    };
    let b = {
        let mut m = ws.create_model("B").unwrap();
        m.add_point("B1", Point::default()).unwrap();
        m.id()
    };

    let names = |ws: &Workspace| -> Vec<String> {
        ws.active().unwrap().points().names().map(str::to_string).collect()
    };

    ws.activate(b).unwrap();
    assert_eq!(names(&ws), vec!["B1"]);
    ws.activate(a).unwrap();
    assert_eq!(names(&ws), vec!["A1", "A2"]);
    ws.activate_by_name("B").unwrap();
    assert_eq!(names(&ws), vec!["B1"]);
}

#[test]
fn entity_creation_needs_an_active_model() {
    let mut ws = Workspace::new();
    let err = ws.active_mut().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Identity);
}

#[test]
fn intersection_sif_needs_three_edges() {
    let mut ws = Workspace::new();
    let mut m = ws.create_model("SIF").unwrap();
    let p1 = m.add_point("P1", Point::new(0.0, 0.0, 0.0)).unwrap();
    let p2 = m.add_point("P2", Point::new(1.0, 0.0, 0.0)).unwrap();
    let p3 = m.add_point("P3", Point::new(2.0, 0.0, 0.0)).unwrap();
    let e1 = m.add_run("E1", p1, p2).unwrap();
    m.add_run("E2", p2, p3).unwrap();

    let err = m.add_sif("T1", Sif::weldolet(e1, p2, 0.1683, 0.0071)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(m.sifs().is_empty());

    // the same point is a valid butt weld location
    assert!(m.add_sif("W1", Sif::butt_weld(e1, p2)).is_ok());
}

#[test]
fn b311_tee_intensifies_bending() {
    const IN: f64 = 0.0254;
    let mut ws = Workspace::new();
    let mut m = ws.create_model("TEE").unwrap();
    m.add_section("6in", Section::pipe(6.625 * IN, 0.28 * IN)).unwrap();
    m.add_material("A106B", Material::a106b()).unwrap();
    m.add_code("B31.1", Code::b311(B311::default())).unwrap();

    let p: Vec<Id<Point>> = (0..4)
        .map(|i| m.add_point(&format!("{}", (i + 1) * 10), Point::new(i as f64, 0.0, 0.0)).unwrap())
        .collect();
    let e1 = m.add_run("E1", p[0], p[1]).unwrap();
    m.add_run("E2", p[1], p[2]).unwrap();
    m.add_run("E3", p[1], p[3]).unwrap();

    let tee = m.add_sif("T20", Sif::unreinforced(e1, p[1], 6.625 * IN, 0.28 * IN)).unwrap();
    m.apply_sifs(&[tee], &[e1]).unwrap();

    let case = m.add_loadcase("EXP", LoadCase::new(StressType::Expansion)).unwrap();
    let mut table = ForceTable::zeros(4, 1);
    let bending = Vec6::new(0.0, 0.0, 0.0, 0.0, 1000.0, 0.0);
    table.set_node_forces(0, 0, bending).unwrap();
    table.set_node_forces(1, 0, bending).unwrap();
    m.set_forces(case, table).unwrap();

    let engine = CodeCheck::new(ws.active().unwrap());
    let [at_10, at_20] = engine.stresses(&mut Units::default(), case, e1).unwrap();
    assert_eq!(at_10.sifi, 1.0);
    assert!(at_20.sifi > 1.0);
    assert_relative_eq!(at_20.bending / at_10.bending, at_20.sifi, epsilon = 1e-9);
    assert_eq!(at_10.sallow, at_20.sallow);
}
