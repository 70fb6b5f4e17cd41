//! # Beam Design
//!
//! Runs one beam through every engine and folds the results into a single
//! pass/fail verdict.
//!
//! ## Stages
//!
//! ```text
//! Start → ClassifySection → {DesignSingly | DesignDoubly} → SelectTensionBars
//!       → [SelectCompressionBars] → DesignShear → [DesignTorsion]
//!       → ComputeDetailing → Aggregate → Done
//! ```
//!
//! Compression bars are selected only for doubly reinforced sections and the
//! torsion stage runs only when a non-zero Tu is present. There are no retries:
//! a contract violation in any stage ends the run with `Err`, while code-check
//! failures are collected into the result.
//!
//! With torsion, flexure is designed for the equivalent moment Me and the
//! stirrups come from the torsion design.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::design::{design_beam, BeamInput};
//! use rcbeam_core::settings::DesignSettings;
//! use rcbeam_core::tables::tables;
//!
//! let input = BeamInput::new("B1", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0)
//!     .with_effective_depth(410.0);
//! let result = design_beam(tables(), &input, &DesignSettings::default()).unwrap();
//!
//! assert!(result.is_safe);
//! assert_eq!(result.remarks, "OK");
//! ```

pub mod batch;
pub mod output;
pub mod report;

pub use batch::{design_batch, BatchEntry, BatchOptions};
pub use output::BeamDesignOutput;
pub use report::{BatchReport, BatchSummary, REPORT_SCHEMA_VERSION};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arrangement::{self, BarArrangement, SelectorOptions};
use crate::calculations::flexure::{self, FlexureInput, FlexureResult, SectionType};
use crate::calculations::shear::{self, nominal_stirrup_spacing, ShearInput, ShearResult, SpacingRule};
use crate::calculations::torsion::{self, equivalent_moment, TorsionInput, TorsionResult};
use crate::clauses;
use crate::detailing::{self, stirrup_legs, DetailingInput, DetailingResult};
use crate::errors::{require_positive_dimension, CalcError, CalcResult};
use crate::materials::bar_area;
use crate::section::{BeamSection, DesignForces};
use crate::settings::DesignSettings;
use crate::tables::CodeTables;

/// Area handed to the selector, capped at the largest practical arrangement.
///
/// A capped area is a design failure, recorded in `failures`.
fn arrangeable_area(
    tables: &CodeTables,
    label: &str,
    required: f64,
    options: &SelectorOptions,
    failures: &mut Vec<String>,
) -> CalcResult<f64> {
    let limit = arrangement::max_selectable_area(tables, options)?;
    if required > limit {
        failures.push(format!(
            "{} {:.0} mm² exceeds any practical bar arrangement ({:.0} mm²) - increase section",
            label, required, limit
        ));
        return Ok(limit);
    }
    Ok(required)
}

/// Default clear cover to stirrups (mm)
pub const DEFAULT_COVER: f64 = 25.0;

/// Default stirrup diameter (mm)
pub const DEFAULT_STIRRUP_DIA: f64 = 8.0;

fn default_cover() -> f64 {
    DEFAULT_COVER
}

fn default_stirrup_dia() -> f64 {
    DEFAULT_STIRRUP_DIA
}

/// One beam to design, as read from an analysis export.
///
/// Field names follow the usual analysis-table headings (`D`, `Mu`, `Vu`, `Tu`).
///
/// ## JSON Example
///
/// ```json
/// {
///   "beam_id": "B12", "story": "L3",
///   "b": 230, "D": 450, "fck": 25, "fy": 500,
///   "Mu": 75, "Vu": 75, "Tu": null,
///   "cover": 25, "stirrup_dia": 8, "span": 5000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamInput {
    pub beam_id: String,
    #[serde(default)]
    pub story: String,
    /// Width b (mm)
    pub b: f64,
    /// Overall depth D (mm)
    #[serde(rename = "D", alias = "overall_depth")]
    pub overall_depth: f64,
    /// Effective depth d (mm); derived from D when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
    pub fck: f64,
    pub fy: f64,
    /// Factored moment (kN·m)
    #[serde(rename = "Mu", alias = "mu")]
    pub mu: f64,
    /// Factored shear (kN)
    #[serde(rename = "Vu", alias = "vu")]
    pub vu: f64,
    /// Factored torsion (kN·m)
    #[serde(rename = "Tu", alias = "tu", default, skip_serializing_if = "Option::is_none")]
    pub tu: Option<f64>,
    #[serde(default = "default_cover")]
    pub cover: f64,
    #[serde(default = "default_stirrup_dia")]
    pub stirrup_dia: f64,
    /// Clear span (mm)
    pub span: f64,
}

impl BeamInput {
    /// Beam with default cover, stirrup size and a 5 m span.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        beam_id: impl Into<String>,
        story: impl Into<String>,
        b: f64,
        overall_depth: f64,
        fck: f64,
        fy: f64,
        mu: f64,
        vu: f64,
    ) -> Self {
        BeamInput {
            beam_id: beam_id.into(),
            story: story.into(),
            b,
            overall_depth,
            d: None,
            fck,
            fy,
            mu,
            vu,
            tu: None,
            cover: DEFAULT_COVER,
            stirrup_dia: DEFAULT_STIRRUP_DIA,
            span: 5000.0,
        }
    }

    pub fn with_effective_depth(mut self, d: f64) -> Self {
        self.d = Some(d);
        self
    }

    pub fn with_torsion(mut self, tu: f64) -> Self {
        self.tu = Some(tu);
        self
    }

    pub fn with_span(mut self, span: f64) -> Self {
        self.span = span;
        self
    }

    pub fn with_cover(mut self, cover: f64, stirrup_dia: f64) -> Self {
        self.cover = cover;
        self.stirrup_dia = stirrup_dia;
        self
    }

    /// Effective depth in effect: the given d, or D − cover − φs − φ/2.
    pub fn effective_depth(&self, settings: &DesignSettings) -> f64 {
        self.d.unwrap_or_else(|| {
            BeamSection::derive_effective_depth(self.overall_depth, self.cover, self.stirrup_dia, settings.assumed_main_dia)
        })
    }

    /// Compression steel depth d': the settings override, else cover + φs + φ/2.
    pub fn compression_depth(&self, settings: &DesignSettings) -> f64 {
        settings
            .d_dash
            .unwrap_or(self.cover + self.stirrup_dia + settings.assumed_main_dia / 2.0)
    }

    /// Cross-section with d resolved.
    pub fn section(&self, settings: &DesignSettings) -> CalcResult<BeamSection> {
        let section = BeamSection::new(
            self.b,
            self.overall_depth,
            self.effective_depth(settings),
            self.cover,
            self.stirrup_dia,
            self.fck,
            self.fy,
        );
        section.validate()?;
        Ok(section)
    }

    pub fn forces(&self) -> DesignForces {
        DesignForces { mu: self.mu, vu: self.vu, tu: self.tu }
    }

    /// Contract checks that do not depend on settings.
    pub fn validate(&self) -> CalcResult<()> {
        if self.beam_id.trim().is_empty() {
            return Err(CalcError::configuration("beam_id", "\"\"", "Beam id must not be empty"));
        }
        require_positive_dimension("span", self.span)?;
        self.forces().validate()
    }
}

/// Orchestrator stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignStage {
    Start,
    ClassifySection,
    DesignSingly,
    DesignDoubly,
    SelectTensionBars,
    SelectCompressionBars,
    DesignShear,
    DesignTorsion,
    ComputeDetailing,
    Aggregate,
    Done,
}

impl DesignStage {
    /// Stages that may directly follow this one.
    pub fn successors(&self) -> &'static [DesignStage] {
        use DesignStage::*;
        match self {
            Start => &[ClassifySection],
            ClassifySection => &[DesignSingly, DesignDoubly],
            DesignSingly | DesignDoubly => &[SelectTensionBars],
            SelectTensionBars => &[SelectCompressionBars, DesignShear],
            SelectCompressionBars => &[DesignShear],
            DesignShear => &[DesignTorsion, ComputeDetailing],
            DesignTorsion => &[ComputeDetailing],
            ComputeDetailing => &[Aggregate],
            Aggregate => &[Done],
            Done => &[],
        }
    }

    pub fn can_follow(&self, previous: DesignStage) -> bool {
        previous.successors().contains(self)
    }
}

/// Records the stages one beam passes through.
struct StageTrace<'a> {
    beam_id: &'a str,
    stages: Vec<DesignStage>,
}

impl<'a> StageTrace<'a> {
    fn new(beam_id: &'a str) -> Self {
        debug!(beam_id, stage = ?DesignStage::Start, "design stage");
        StageTrace {
            beam_id,
            stages: vec![DesignStage::Start],
        }
    }

    fn enter(&mut self, stage: DesignStage) {
        debug_assert!(
            self.stages.last().is_some_and(|prev| stage.can_follow(*prev)),
            "illegal transition to {:?} after {:?}",
            stage,
            self.stages.last()
        );
        debug!(beam_id = self.beam_id, stage = ?stage, "design stage");
        self.stages.push(stage);
    }

    fn finish(self) -> Vec<DesignStage> {
        self.stages
    }
}

/// Complete design of one beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamDesignResult {
    pub beam_id: String,
    pub story: String,
    pub section: BeamSection,
    pub forces: DesignForces,
    /// Moment used for flexure: |Mu|, or Me under torsion (kN·m)
    pub design_moment: f64,
    pub flexure: FlexureResult,
    pub tension_bars: BarArrangement,
    pub compression_bars: Option<BarArrangement>,
    /// Hanger bar diameter on the compression face of singly reinforced beams (mm)
    pub hanger_dia: f64,
    pub shear: ShearResult,
    pub torsion: Option<TorsionResult>,
    pub detailing: DetailingResult,
    /// Stages visited, in order
    pub stages: Vec<DesignStage>,
    /// AND of every check
    pub is_safe: bool,
    /// Failure messages joined with "; ", or "OK"
    pub remarks: String,
    pub failures: Vec<String>,
    /// Informational notes that do not affect `is_safe`
    pub notes: Vec<String>,
}

impl BeamDesignResult {
    /// Flat output record
    pub fn output(&self) -> BeamDesignOutput {
        BeamDesignOutput::from_result(self)
    }
}

/// Design one beam.
///
/// # Returns
///
/// * `Ok(BeamDesignResult)` - Design with `is_safe` and remarks
/// * `Err(CalcError)` - Contract violation in the input or settings
pub fn design_beam(tables: &CodeTables, input: &BeamInput, settings: &DesignSettings) -> CalcResult<BeamDesignResult> {
    let mut trace = StageTrace::new(&input.beam_id);

    input.validate()?;
    settings.validate()?;
    let section = input.section(settings)?;
    let forces = input.forces();
    let has_torsion = forces.has_torsion();
    let tu = forces.tu.unwrap_or(0.0);
    let BeamSection { b, overall_depth, d, cover, stirrup_dia, fck, fy } = section;

    trace.enter(DesignStage::ClassifySection);
    let design_moment = if has_torsion {
        equivalent_moment(forces.mu, tu, overall_depth, b)
    } else {
        forces.mu.abs()
    };
    let flexure_input = FlexureInput::from_section(&section, design_moment).with_d_dash(input.compression_depth(settings));
    let flexure = flexure::design(tables, &flexure_input)?;
    trace.enter(match flexure.section_type {
        SectionType::Singly => DesignStage::DesignSingly,
        SectionType::Doubly => DesignStage::DesignDoubly,
    });

    trace.enter(DesignStage::SelectTensionBars);
    let mut failures = Vec::new();
    let options = settings.selector_options();
    let ast_to_arrange = arrangeable_area(tables, "Ast", flexure.ast_required, &options, &mut failures)?;
    let tension_bars = arrangement::select(tables, ast_to_arrange, b, cover, stirrup_dia, &options)?;

    let compression_bars = if flexure.section_type == SectionType::Doubly {
        trace.enter(DesignStage::SelectCompressionBars);
        let compression_options = SelectorOptions { preferred_dia: None, ..options.clone() };
        let asc_to_arrange =
            arrangeable_area(tables, "Asc", flexure.asc_required, &compression_options, &mut failures)?;
        Some(arrangement::select(
            tables,
            asc_to_arrange,
            b,
            cover,
            stirrup_dia,
            &compression_options,
        )?)
    } else {
        None
    };

    trace.enter(DesignStage::DesignShear);
    let legs = stirrup_legs(b);
    let asv = legs as f64 * bar_area(stirrup_dia);
    let shear = shear::design(tables, &ShearInput::new(forces.vu, b, d, fck, fy, asv, flexure.pt))?;

    let torsion = if has_torsion {
        trace.enter(DesignStage::DesignTorsion);
        Some(torsion::design(
            tables,
            &TorsionInput {
                tu,
                vu: forces.vu,
                mu: forces.mu,
                b,
                overall_depth,
                d,
                fck,
                fy,
                cover,
                stirrup_dia,
                pt: flexure.pt,
            },
        )?)
    } else {
        None
    };

    trace.enter(DesignStage::ComputeDetailing);
    let design_spacing = torsion.as_ref().map_or(shear.spacing, |t| t.stirrup_spacing);
    let detailing = detailing::detail(
        tables,
        &DetailingInput {
            b,
            overall_depth,
            d,
            cover,
            stirrup_dia,
            fck,
            fy,
            bar_dia: tension_bars.diameter,
            bars_per_layer: tension_bars.bars_per_layer,
            compression_dia: compression_bars.as_ref().map(|c| c.diameter),
            span: input.span,
            design_spacing,
            nominal_spacing: nominal_stirrup_spacing(asv, b, fy),
            has_torsion,
            surface: settings.bar_surface,
            splice_percent: settings.splice_percent,
            seismic: settings.seismic,
            aggregate_size: settings.aggregate_size,
            side_face_dia: settings.hanger_dia,
        },
    )?;

    trace.enter(DesignStage::Aggregate);
    let mut notes = flexure.notes.clone();

    failures.extend(flexure.error_message.clone());
    failures.extend(tension_bars.spacing_remark());
    if let Some(bars) = &compression_bars {
        failures.extend(bars.spacing_remark().map(|r| format!("Compression {}", r)));
    }
    failures.extend(shear.message.clone());
    match &torsion {
        Some(t) => {
            failures.extend(t.errors.iter().cloned());
            notes.push(format!(
                "Flexure designed for Me = {:.1} kN·m ({})",
                t.me,
                clauses::EQUIVALENT_MOMENT
            ));
            notes.push(format!(
                "Closed stirrups required; longitudinal torsion steel Al = {:.0} mm² ({})",
                t.al_torsion,
                clauses::TORSION_STIRRUPS
            ));
        }
        None => {
            if shear.design_governs && shear.spacing_rule == SpacingRule::Minimum {
                notes.push(format!(
                    "Minimum shear reinforcement governs stirrups at {:.0} mm ({})",
                    shear.spacing,
                    shear.spacing_rule.clause()
                ));
            }
            if shear.is_safe && !shear.accepts_spacing(detailing.zones.support_spacing) {
                failures.push(format!(
                    "Stirrup spacing {:.0}mm exceeds required {:.0}mm ({})",
                    detailing.zones.support_spacing,
                    shear.spacing,
                    clauses::SHEAR_REINFORCEMENT
                ));
            }
        }
    }
    if settings.seismic {
        notes.push(format!(
            "Ductile detailing: stirrups at {:.0} mm over {:.0} mm at each support ({})",
            detailing.zones.support_spacing,
            detailing.zones.support_length,
            clauses::SEISMIC_HOOPS
        ));
    }
    if detailing.side_face.required {
        notes.push(format!(
            "Side-face steel {} ({})",
            detailing.side_face.callout(),
            clauses::SIDE_FACE
        ));
    }

    let is_safe = flexure.is_safe
        && shear.is_safe
        && torsion.as_ref().map_or(true, |t| t.is_safe)
        && tension_bars.spacing_ok
        && compression_bars.as_ref().map_or(true, |c| c.spacing_ok)
        && failures.is_empty();
    let remarks = if failures.is_empty() {
        "OK".to_string()
    } else {
        failures.join("; ")
    };

    trace.enter(DesignStage::Done);
    if !is_safe {
        warn!(beam_id = %input.beam_id, story = %input.story, remarks = %remarks, "beam design failed");
    }

    Ok(BeamDesignResult {
        beam_id: input.beam_id.clone(),
        story: input.story.clone(),
        section,
        forces,
        design_moment,
        flexure,
        tension_bars,
        compression_bars,
        hanger_dia: settings.hanger_dia,
        shear,
        torsion,
        detailing,
        stages: trace.finish(),
        is_safe,
        remarks,
        failures,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::tables;
    use approx::assert_relative_eq;

    fn worked_beam() -> BeamInput {
        BeamInput::new("B1", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0).with_effective_depth(410.0)
    }

    fn run(input: &BeamInput) -> BeamDesignResult {
        design_beam(tables(), input, &DesignSettings::default()).unwrap()
    }

    #[test]
    fn test_worked_beam() {
        let result = run(&worked_beam());
        assert_eq!(result.flexure.section_type, SectionType::Singly);
        assert_relative_eq!(result.flexure.ast_required, 466.98, epsilon = 0.05);
        assert_eq!(result.flexure.asc_required, 0.0);
        assert!(result.tension_bars.area_provided >= result.flexure.ast_required);
        assert_eq!(result.tension_bars.callout(), "5-12φ");
        assert!(result.compression_bars.is_none());
        assert_relative_eq!(result.shear.tau_c, 0.49, epsilon = 0.005);
        assert!(result.shear.accepts_spacing(150.0));
        assert!(result.is_safe);
        assert_eq!(result.remarks, "OK");
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_worked_beam_with_preferred_16() {
        let settings = DesignSettings { preferred_dia: Some(16.0), ..DesignSettings::default() };
        let result = design_beam(tables(), &worked_beam(), &settings).unwrap();
        assert_eq!(result.tension_bars.callout(), "3-16φ");
        assert_eq!(result.detailing.stirrup_callout(), "2L-8φ@300 c/c");
        assert!(result.is_safe);
    }

    #[test]
    fn test_stage_sequence_singly() {
        use DesignStage::*;
        let result = run(&worked_beam());
        assert_eq!(
            result.stages,
            vec![Start, ClassifySection, DesignSingly, SelectTensionBars, DesignShear, ComputeDetailing, Aggregate, Done]
        );
    }

    #[test]
    fn test_stage_sequence_doubly_with_torsion() {
        use DesignStage::*;
        let input = BeamInput::new("B2", "L1", 300.0, 500.0, 25.0, 500.0, 220.0, 100.0)
            .with_effective_depth(450.0)
            .with_torsion(10.0);
        let result = run(&input);
        assert_eq!(result.flexure.section_type, SectionType::Doubly);
        assert_eq!(
            result.stages,
            vec![
                Start,
                ClassifySection,
                DesignDoubly,
                SelectTensionBars,
                SelectCompressionBars,
                DesignShear,
                DesignTorsion,
                ComputeDetailing,
                Aggregate,
                Done
            ]
        );
        for pair in result.stages.windows(2) {
            assert!(pair[1].can_follow(pair[0]));
        }
        let compression = result.compression_bars.as_ref().unwrap();
        assert!(compression.area_provided >= result.flexure.asc_required);
    }

    #[test]
    fn test_torsion_uses_equivalent_moment() {
        let input = BeamInput::new("T1", "L2", 300.0, 500.0, 25.0, 500.0, 150.0, 100.0)
            .with_effective_depth(450.0)
            .with_torsion(10.0);
        let result = run(&input);
        let torsion = result.torsion.as_ref().unwrap();
        assert_relative_eq!(torsion.ve, 153.33, epsilon = 0.01);
        assert_relative_eq!(result.design_moment, torsion.me);
        assert_relative_eq!(result.flexure.mu, torsion.me);
        assert!(torsion.is_safe);
        assert!(result.detailing.zones.support_spacing <= torsion.stirrup_spacing);
        assert_eq!(result.detailing.zones.mid_spacing, result.detailing.zones.support_spacing);
        assert!(result.notes.iter().any(|n| n.contains("Al =")));
    }

    #[test]
    fn test_zero_torsion_skips_stage() {
        let result = run(&worked_beam().with_torsion(0.0));
        assert!(result.torsion.is_none());
        assert!(!result.stages.contains(&DesignStage::DesignTorsion));
    }

    #[test]
    fn test_wide_mild_steel_beam_gets_minimum_stirrups() {
        let input = BeamInput::new("B5", "L1", 450.0, 550.0, 25.0, 250.0, 150.0, 125.0).with_effective_depth(500.0);
        let result = run(&input);
        let minimum = nominal_stirrup_spacing(2.0 * bar_area(8.0), 450.0, 250.0);

        assert!(result.shear.spacing <= minimum + 1e-9);
        assert!(result.detailing.zones.support_spacing <= minimum);
        assert!(result.detailing.zones.mid_spacing <= minimum);
        assert_eq!(result.detailing.stirrup_callout(), "2L-8φ@100 c/c");
        assert!(result.is_safe);
    }

    #[test]
    fn test_seismic_note_cites_ductile_detailing() {
        let result = design_beam(tables(), &worked_beam(), &DesignSettings::default().with_seismic(true)).unwrap();
        assert!(result.notes.iter().any(|n| n.contains(clauses::SEISMIC_HOOPS)));
        assert!(result.detailing.zones.support_spacing <= 100.0);
    }

    #[test]
    fn test_absurd_moment_is_a_design_failure() {
        let input = BeamInput::new("B9", "L1", 230.0, 450.0, 25.0, 500.0, 1.0e9, 75.0).with_effective_depth(410.0);
        let result = run(&input);
        assert_eq!(result.flexure.section_type, SectionType::Doubly);
        assert!(!result.is_safe);
        assert!(result.remarks.contains("exceeds any practical bar arrangement"));
        assert!(!result.tension_bars.spacing_ok);
    }

    #[test]
    fn test_shear_failure_is_data() {
        let input = BeamInput::new("B3", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 400.0).with_effective_depth(410.0);
        let result = run(&input);
        assert!(!result.is_safe);
        assert!(result.remarks.contains("Shear failure"));
    }

    #[test]
    fn test_minimum_steel_is_note_not_failure() {
        let input = BeamInput::new("B4", "L1", 230.0, 450.0, 25.0, 500.0, 5.0, 10.0).with_effective_depth(410.0);
        let result = run(&input);
        assert!(result.is_safe);
        assert_eq!(result.remarks, "OK");
        assert!(result.notes.iter().any(|n| n.contains("Minimum steel governs")));
    }

    #[test]
    fn test_effective_depth_derived() {
        let input = BeamInput::new("B5", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0);
        let result = run(&input);
        // 450 − 25 − 8 − 16/2
        assert_relative_eq!(result.section.d, 409.0);
    }

    #[test]
    fn test_contract_violations_surface() {
        let bad_depth = worked_beam().with_effective_depth(460.0);
        let err = design_beam(tables(), &bad_depth, &DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "DIMENSION_ERROR");

        let mut bad_grade = worked_beam();
        bad_grade.fck = 0.0;
        let err = design_beam(tables(), &bad_grade, &DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_ERROR");

        let no_span = worked_beam().with_span(0.0);
        assert!(design_beam(tables(), &no_span, &DesignSettings::default()).is_err());
    }

    #[test]
    fn test_beam_input_json_field_names() {
        let json = r#"{"beam_id":"B12","story":"L3","b":230,"D":450,"fck":25,"fy":500,"Mu":75,"Vu":75,"span":5000}"#;
        let input: BeamInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.overall_depth, 450.0);
        assert_eq!(input.cover, 25.0);
        assert_eq!(input.stirrup_dia, 8.0);
        assert_eq!(input.tu, None);
        assert_eq!(input.d, None);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let input = worked_beam();
        let before = input.clone();
        let first = run(&input);
        let second = run(&input);
        assert_eq!(input, before);
        assert_eq!(first, second);
    }
}
