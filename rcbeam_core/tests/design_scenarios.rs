use std::fs;
use std::sync::atomic::AtomicBool;

use approx::assert_relative_eq;
use tempfile::TempDir;

use rcbeam_core::arrangement::{self, SelectorOptions};
use rcbeam_core::calculations::flexure::{self, limiting_moment, FlexureInput, SectionType};
use rcbeam_core::calculations::shear::nominal_stirrup_spacing;
use rcbeam_core::calculations::torsion::{self, TorsionInput};
use rcbeam_core::design::{design_batch, design_beam, BatchEntry, BatchOptions, BeamInput};
use rcbeam_core::detailing::{
    development_length, lap_length, side_face_reinforcement, stirrup_legs, SIDE_FACE_MAX_SPACING,
};
use rcbeam_core::file_io::{load_beam_inputs, load_report, save_report};
use rcbeam_core::materials::{bar_area, BarStress, BarSurface};
use rcbeam_core::settings::DesignSettings;
use rcbeam_core::tables::tables;

fn worked_beam() -> BeamInput {
    BeamInput::new("B1", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0).with_effective_depth(410.0)
}

// b=230, D=450, d=410, M25, Fe500, Mu=75, Vu=75
#[test]
fn worked_beam_with_16mm_bars() {
    let settings = DesignSettings { preferred_dia: Some(16.0), ..DesignSettings::default() };
    let result = design_beam(tables(), &worked_beam(), &settings).unwrap();

    assert_eq!(result.flexure.section_type, SectionType::Singly);
    assert_eq!(result.flexure.asc_required, 0.0);
    assert_eq!(result.tension_bars.callout(), "3-16φ");
    assert_relative_eq!(result.tension_bars.area_provided, 603.19, epsilon = 0.01);
    assert!(result.tension_bars.area_provided >= result.flexure.ast_required);

    assert_relative_eq!(result.shear.tau_v, 0.795, epsilon = 0.001);
    assert_relative_eq!(result.shear.tau_c, 0.49, epsilon = 0.005);
    assert!(result.shear.tau_v > result.shear.tau_c);
    assert!(result.shear.accepts_spacing(150.0));

    let row = result.output();
    assert!(row.is_safe);
    assert_eq!(row.remarks, "OK");
    assert!(row.stirrups.starts_with("2L-8φ@"));
}

#[test]
fn development_length_16mm_m25_fe500() {
    let ld = development_length(tables(), 16.0, 500.0, 25.0, BarSurface::Deformed, BarStress::Tension).unwrap();
    assert_relative_eq!(ld, 16.0 * 0.87 * 500.0 / (4.0 * 2.24), epsilon = 1e-9);
    assert_relative_eq!(ld, 776.8, epsilon = 0.1);
}

#[test]
fn torsion_scenario() {
    let input = TorsionInput {
        tu: 10.0,
        vu: 100.0,
        mu: 150.0,
        b: 300.0,
        overall_depth: 500.0,
        d: 450.0,
        fck: 25.0,
        fy: 500.0,
        cover: 25.0,
        stirrup_dia: 8.0,
        pt: 0.5,
    };
    let result = torsion::design(tables(), &input).unwrap();
    assert_relative_eq!(result.ve, 153.33, epsilon = 0.01);
    assert!(result.is_safe);
    assert!(result.stirrup_spacing <= 300.0);
    assert!(result.al_torsion > 0.0);
    assert!(result.requires_closed_stirrups);
}

#[test]
fn torsion_scenario_through_orchestrator() {
    let input = BeamInput::new("B7", "L2", 300.0, 500.0, 25.0, 500.0, 150.0, 100.0)
        .with_effective_depth(450.0)
        .with_torsion(10.0);
    let result = design_beam(tables(), &input, &DesignSettings::default()).unwrap();

    let torsion = result.torsion.as_ref().unwrap();
    assert_relative_eq!(torsion.ve, 153.33, epsilon = 0.01);
    assert!(torsion.is_safe);
    assert_relative_eq!(result.design_moment, torsion.me);
    assert!(result.design_moment > 150.0);
    assert!(result.detailing.zones.support_spacing <= 300.0);
}

#[test]
fn stirrups_never_looser_than_minimum_reinforcement() {
    let minimum = nominal_stirrup_spacing(2.0 * bar_area(8.0), 450.0, 250.0);
    let mut previous = f64::INFINITY;
    for step in 0..40 {
        let vu = 60.0 + step as f64 * 5.0;
        let input = BeamInput::new("B5", "L1", 450.0, 550.0, 25.0, 250.0, 150.0, vu).with_effective_depth(500.0);
        let result = design_beam(tables(), &input, &DesignSettings::default()).unwrap();
        let spacing = result.detailing.zones.support_spacing;
        assert!(spacing <= minimum, "Vu={vu} spacing={spacing}");
        assert!(spacing <= previous, "Vu={vu} spacing={spacing}");
        previous = spacing;
    }
}

#[test]
fn below_limiting_moment_is_always_singly() {
    for &(b, d) in &[(230.0, 410.0), (300.0, 500.0), (400.0, 650.0)] {
        for &fck in &[20.0, 25.0, 30.0] {
            for &fy in &[415.0, 500.0] {
                let (mu_lim, _) = limiting_moment(b, d, fck, fy);
                for &fraction in &[0.05, 0.3, 0.6, 0.9, 0.999] {
                    let input = FlexureInput::new(b, d, d + 40.0, fraction * mu_lim, fck, fy);
                    let result = flexure::design(tables(), &input).unwrap();
                    assert_eq!(result.section_type, SectionType::Singly, "b={b} d={d} fck={fck} fy={fy}");
                    assert_eq!(result.asc_required, 0.0);
                }
            }
        }
    }
}

#[test]
fn above_limiting_moment_is_doubly() {
    let (mu_lim, _) = limiting_moment(230.0, 410.0, 25.0, 500.0);
    let input = FlexureInput::new(230.0, 410.0, 450.0, 1.2 * mu_lim, 25.0, 500.0);
    let result = flexure::design(tables(), &input).unwrap();
    assert_eq!(result.section_type, SectionType::Doubly);
    assert!(result.asc_required > 0.0);
}

#[test]
fn selected_bars_always_cover_required_area() {
    let options = SelectorOptions::default();
    for &b in &[230.0, 300.0, 450.0] {
        let mut ast = 50.0;
        while ast < 3000.0 {
            let bars = arrangement::select(tables(), ast, b, 25.0, 8.0, &options).unwrap();
            assert!(bars.count >= 2);
            assert!(bars.area_provided >= ast, "b={b} ast={ast} got {}", bars.describe());
            let again = arrangement::select(tables(), ast, b, 25.0, 8.0, &options).unwrap();
            assert_eq!(bars, again);
            ast += 137.0;
        }
    }
}

#[test]
fn lap_length_ordering() {
    let ld = development_length(tables(), 20.0, 500.0, 25.0, BarSurface::Deformed, BarStress::Tension).unwrap();
    let half = lap_length(ld, 50.0, false, BarStress::Tension).unwrap();
    let most = lap_length(ld, 75.0, false, BarStress::Tension).unwrap();
    let seismic = lap_length(ld, 50.0, true, BarStress::Tension).unwrap();

    assert_eq!(half, ld);
    assert!(most > half);
    assert_relative_eq!(seismic, 1.5 * ld);
    assert!(seismic > most);
    assert_eq!(lap_length(ld, 100.0, true, BarStress::Compression).unwrap(), ld);
}

#[test]
fn side_face_boundary() {
    let at_limit = side_face_reinforcement(750.0, 300.0, 25.0, 12.0).unwrap();
    assert!(!at_limit.required);

    let above = side_face_reinforcement(751.0, 300.0, 25.0, 12.0).unwrap();
    assert!(above.required);
    assert_relative_eq!(above.area_per_face, 0.001 * 300.0 * (751.0 - 50.0));
    assert_eq!(above.max_spacing, SIDE_FACE_MAX_SPACING);
    assert_eq!(above.max_spacing, 300.0);
}

#[test]
fn stirrup_leg_counts() {
    assert_eq!(stirrup_legs(230.0), 2);
    assert_eq!(stirrup_legs(400.0), 2);
    assert_eq!(stirrup_legs(500.0), 4);
    assert_eq!(stirrup_legs(700.0), 6);
}

#[test]
fn batch_from_file_to_saved_report() {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("model.json");
    fs::write(
        &input_path,
        r#"{
  "forces": [
    { "beam_id": "B2", "story": "L2", "Mu": 40, "Vu": 50 },
    { "beam_id": "B1", "story": "L2", "Mu": 60, "Vu": 70 },
    { "beam_id": "B1", "story": "L2", "Mu": 75, "Vu": 75 },
    { "beam_id": "B1", "story": "L1", "Mu": 75, "Vu": 400 }
  ],
  "geometry": [
    { "beam_id": "B1", "story": "L1", "b": 230, "D": 450, "d": 410, "fck": 25, "fy": 500, "span": 5000 },
    { "beam_id": "B1", "story": "L2", "b": 230, "D": 450, "d": 410, "fck": 25, "fy": 500, "span": 5000 },
    { "beam_id": "B2", "story": "L2", "b": 230, "D": 450, "fck": 25, "fy": 500, "span": 4000 }
  ]
}"#,
    )
    .unwrap();

    let beams = load_beam_inputs(&input_path).unwrap();
    assert_eq!(beams.len(), 3);
    let enveloped = beams.iter().find(|b| b.story == "L2" && b.beam_id == "B1").unwrap();
    assert_eq!(enveloped.mu, 75.0);
    assert_eq!(enveloped.vu, 75.0);

    let cancel = AtomicBool::new(false);
    let report =
        design_batch(tables(), &beams, DesignSettings::default(), &BatchOptions::with_workers(2), &cancel).unwrap();

    let order: Vec<(&str, &str)> = report.entries.iter().map(|e| (e.story(), e.beam_id())).collect();
    assert_eq!(order, vec![("L1", "B1"), ("L2", "B1"), ("L2", "B2")]);
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.failed, 1);
    assert!(!report.summary.all_passed());

    match &report.entries[0] {
        BatchEntry::Designed(result) => {
            assert!(!result.is_safe);
            assert!(result.remarks.contains("Shear failure"));
        }
        other => panic!("expected a designed beam, got {:?}", other),
    }

    let report_path = dir.path().join("report.json");
    save_report(&report, &report_path).unwrap();
    let loaded = load_report(&report_path).unwrap();
    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.summary, report.summary);
    assert_eq!(loaded.outputs().len(), 3);
}
