//! Flat per-beam output record, one row of a design schedule.

use serde::{Deserialize, Serialize};

use super::BeamDesignResult;
use crate::calculations::SectionType;

/// One row of the beam schedule.
///
/// ## JSON Example
///
/// ```json
/// {
///   "beam_id": "B1", "story": "L1", "section_type": "Singly",
///   "ast_required": 466.98, "ast_provided": 565.49,
///   "asc_required": 0.0, "asc_provided": 0.0,
///   "tension_bars": "5-12φ", "compression_bars": "2-12φ",
///   "stirrups": "2L-8φ@300 c/c", "stirrups_mid": "2L-8φ@300 c/c",
///   "side_face": "-", "ld": 582.6, "lap_length": 582.6, "bar_spacing": 38.0,
///   "is_safe": true, "remarks": "OK"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamDesignOutput {
    pub beam_id: String,
    pub story: String,
    pub section_type: SectionType,
    /// Design moment, Me under torsion (kN·m)
    pub mu_design: f64,
    pub ast_required: f64,
    pub ast_provided: f64,
    pub asc_required: f64,
    pub asc_provided: f64,
    /// Tension bar callout, e.g. `3-16φ`
    pub tension_bars: String,
    /// Compression bars, or hanger bars for singly reinforced sections
    pub compression_bars: String,
    /// Support-zone stirrups, e.g. `2L-8φ@150 c/c`
    pub stirrups: String,
    /// Mid-span stirrups
    pub stirrups_mid: String,
    pub side_face: String,
    /// Tension development length (mm)
    pub ld: f64,
    pub lap_length: f64,
    /// Centre-to-centre tension bar spacing (mm)
    pub bar_spacing: f64,
    pub is_safe: bool,
    pub remarks: String,
}

impl BeamDesignOutput {
    pub fn from_result(result: &BeamDesignResult) -> Self {
        let detailing = &result.detailing;
        let (compression_bars, asc_provided) = match &result.compression_bars {
            Some(bars) => (bars.callout(), bars.area_provided),
            None => (format!("2-{}φ", result.hanger_dia.round() as i64), 0.0),
        };
        BeamDesignOutput {
            beam_id: result.beam_id.clone(),
            story: result.story.clone(),
            section_type: result.flexure.section_type,
            mu_design: result.design_moment,
            ast_required: result.flexure.ast_required,
            ast_provided: result.tension_bars.area_provided,
            asc_required: result.flexure.asc_required,
            asc_provided,
            tension_bars: result.tension_bars.callout(),
            compression_bars,
            stirrups: detailing.stirrup_callout(),
            stirrups_mid: format!(
                "{}L-{}φ@{} c/c",
                detailing.stirrup_legs,
                detailing.stirrup_dia.round() as i64,
                detailing.zones.mid_spacing.round() as i64
            ),
            side_face: detailing.side_face.callout(),
            ld: detailing.ld_tension,
            lap_length: detailing.lap_length,
            bar_spacing: detailing.bar_spacing_cc,
            is_safe: result.is_safe,
            remarks: result.remarks.clone(),
        }
    }
}
