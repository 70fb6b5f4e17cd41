//! # Detailing (IS 456 26)
//!
//! Lengths and spacings needed to draw a designed beam:
//!
//! - Development length `Ld = φ·0.87fy / (4·τbd)`, with τbd raised 25% for bars in compression
//! - Lap length `Ld·α`: α = 1.0 up to 50% of bars spliced at a section, 1.3 above,
//!   1.5 under seismic detailing; compression laps always use α = 1.0
//! - Centre-to-centre bar spacing and the minimum clear spacing check
//! - Side-face reinforcement for webs deeper than 750 mm
//! - Stirrup legs by width and stirrup zones along the span
//!
//! Every function is pure. Invalid inputs return [`CalcError`]; a failed
//! spacing check is reported as data.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arrangement::min_clear_spacing;
use crate::calculations::shear::max_stirrup_spacing;
use crate::clauses;
use crate::errors::{require_positive_dimension, require_positive_strength, CalcError, CalcResult};
use crate::materials::{bar_area, steel_design_stress, BarStress, BarSurface};
use crate::tables::CodeTables;

/// Webs deeper than this need side-face steel (mm)
pub const SIDE_FACE_DEPTH_LIMIT: f64 = 750.0;

/// Maximum spacing of side-face bars (mm)
pub const SIDE_FACE_MAX_SPACING: f64 = 300.0;

/// Default diameter suggested for side-face bars (mm)
pub const SIDE_FACE_BAR_DIA: f64 = 12.0;

/// Seismic support-zone stirrup cap (mm)
pub const SEISMIC_SUPPORT_SPACING_CAP: f64 = 100.0;

/// Increase of bond stress for bars in compression
const COMPRESSION_BOND_FACTOR: f64 = 1.25;

/// Development length Ld (mm).
///
/// ```rust
/// use rcbeam_core::detailing::development_length;
/// use rcbeam_core::materials::{BarStress, BarSurface};
/// use rcbeam_core::tables::tables;
///
/// let ld = development_length(tables(), 16.0, 500.0, 25.0, BarSurface::Deformed, BarStress::Tension).unwrap();
/// assert!((ld - 776.8).abs() < 0.1);
/// ```
pub fn development_length(
    tables: &CodeTables,
    dia: f64,
    fy: f64,
    fck: f64,
    surface: BarSurface,
    stress: BarStress,
) -> CalcResult<f64> {
    require_positive_dimension("dia", dia)?;
    require_positive_strength("fy", fy)?;
    let mut tau_bd = tables.bond_stress(fck, surface)?;
    if stress == BarStress::Compression {
        tau_bd *= COMPRESSION_BOND_FACTOR;
    }
    Ok(dia * steel_design_stress(fy) / (4.0 * tau_bd))
}

/// Lap multiplier α applied to Ld.
pub fn lap_factor(splice_percent: f64, seismic: bool, stress: BarStress) -> f64 {
    match stress {
        BarStress::Compression => 1.0,
        BarStress::Tension if seismic => 1.5,
        BarStress::Tension if splice_percent > 50.0 => 1.3,
        BarStress::Tension => 1.0,
    }
}

/// Lap length Ld·α (mm).
///
/// `splice_percent` is the share of bars lapped at one section (0–100).
pub fn lap_length(ld: f64, splice_percent: f64, seismic: bool, stress: BarStress) -> CalcResult<f64> {
    require_positive_dimension("ld", ld)?;
    if !splice_percent.is_finite() || !(0.0..=100.0).contains(&splice_percent) {
        return Err(CalcError::configuration(
            "splice_percent",
            splice_percent,
            "Spliced share must be between 0 and 100 percent",
        ));
    }
    Ok(ld * lap_factor(splice_percent, seismic, stress))
}

/// Centre-to-centre spacing of `count` bars in one layer (mm).
pub fn bar_spacing_cc(b: f64, cover: f64, stirrup_dia: f64, dia: f64, count: u32) -> CalcResult<f64> {
    if count < 2 {
        return Err(CalcError::configuration(
            "count",
            count,
            "Spacing needs at least two bars in the layer",
        ));
    }
    require_positive_dimension("b", b)?;
    require_positive_dimension("dia", dia)?;
    let available = b - 2.0 * (cover + stirrup_dia) - dia;
    if available <= 0.0 {
        return Err(CalcError::dimension("b", b, "No clear width inside the stirrups"));
    }
    Ok(available / (count - 1) as f64)
}

/// Whether a clear spacing meets max(φ, aggregate + 5, 25).
pub fn check_min_spacing(clear_spacing: f64, dia: f64, aggregate_size: f64) -> bool {
    clear_spacing >= min_clear_spacing(dia, aggregate_size) - 1e-9
}

/// Number of stirrup legs for a beam width.
pub fn stirrup_legs(b: f64) -> u32 {
    if b <= 450.0 {
        2
    } else if b <= 600.0 {
        4
    } else {
        6
    }
}

/// Round a stirrup spacing down to a buildable value.
///
/// Steps of 25 mm above 100 mm and 5 mm below; values under 5 mm are kept.
pub fn round_down_spacing(spacing: f64) -> f64 {
    if spacing >= 100.0 {
        (spacing / 25.0 + 1e-9).floor() * 25.0
    } else if spacing >= 5.0 {
        (spacing / 5.0 + 1e-9).floor() * 5.0
    } else {
        spacing
    }
}

/// Side-face reinforcement on each vertical face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideFaceSteel {
    pub required: bool,
    /// Area per face, 0.1% of the web area (mm²)
    pub area_per_face: f64,
    /// Maximum vertical spacing (mm)
    pub max_spacing: f64,
    /// Suggested bar diameter (mm)
    pub bar_dia: f64,
    /// Suggested bars per face
    pub bars_per_face: u32,
}

impl SideFaceSteel {
    fn not_required() -> Self {
        SideFaceSteel {
            required: false,
            area_per_face: 0.0,
            max_spacing: SIDE_FACE_MAX_SPACING,
            bar_dia: 0.0,
            bars_per_face: 0,
        }
    }

    /// e.g. `2-12φ EF`, or `-` when not required
    pub fn callout(&self) -> String {
        if self.required {
            format!("{}-{}φ EF", self.bars_per_face, self.bar_dia.round() as i64)
        } else {
            "-".to_string()
        }
    }
}

/// Side-face steel for a section of overall depth `overall_depth`.
pub fn side_face_reinforcement(overall_depth: f64, b: f64, cover: f64, bar_dia: f64) -> CalcResult<SideFaceSteel> {
    require_positive_dimension("D", overall_depth)?;
    require_positive_dimension("b", b)?;
    require_positive_dimension("side_face_dia", bar_dia)?;
    if overall_depth <= SIDE_FACE_DEPTH_LIMIT {
        return Ok(SideFaceSteel::not_required());
    }
    let web = overall_depth - 2.0 * cover;
    if web <= 0.0 {
        return Err(CalcError::dimension("cover", cover, "Cover leaves no web"));
    }
    let area_per_face = 0.001 * b * web;
    let by_area = (area_per_face / bar_area(bar_dia)).ceil() as u32;
    let by_spacing = ((web / SIDE_FACE_MAX_SPACING).ceil() as u32).saturating_sub(1);
    Ok(SideFaceSteel {
        required: true,
        area_per_face,
        max_spacing: SIDE_FACE_MAX_SPACING,
        bar_dia,
        bars_per_face: by_area.max(by_spacing).max(1),
    })
}

/// Stirrup spacing by zone along the span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupZones {
    /// Length of each support zone (mm)
    pub support_length: f64,
    /// Spacing within the support zones (mm)
    pub support_spacing: f64,
    /// Spacing over the middle of the span (mm)
    pub mid_spacing: f64,
}

/// Inputs that set the stirrup zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneInput {
    pub d: f64,
    pub span: f64,
    /// Governing design spacing at the supports (mm)
    pub design_spacing: f64,
    /// Minimum-reinforcement spacing (mm)
    pub nominal_spacing: f64,
    /// Smallest main bar diameter (mm)
    pub min_main_dia: f64,
    pub seismic: bool,
    pub has_torsion: bool,
}

/// Lay out support and mid-span stirrup zones.
///
/// Support zones run 2d from each face, clipped to half the span. Under
/// seismic detailing the support spacing is held to min(d/4, 8φ, 100) and
/// the mid-span spacing to d/2. Torsion keeps the support spacing throughout.
pub fn stirrup_zones(input: &ZoneInput) -> CalcResult<StirrupZones> {
    require_positive_dimension("d", input.d)?;
    require_positive_dimension("span", input.span)?;
    require_positive_dimension("design_spacing", input.design_spacing)?;
    require_positive_dimension("nominal_spacing", input.nominal_spacing)?;

    let support_length = (2.0 * input.d).min(input.span / 2.0);
    let cap = max_stirrup_spacing(input.d);

    let mut support = input.design_spacing.min(cap);
    let mut mid = input.nominal_spacing.min(cap);
    if input.seismic {
        support = support
            .min(input.d / 4.0)
            .min(8.0 * input.min_main_dia)
            .min(SEISMIC_SUPPORT_SPACING_CAP);
        mid = mid.min(input.d / 2.0);
    }
    if input.has_torsion {
        mid = support;
    }
    let mid = mid.max(support);

    Ok(StirrupZones {
        support_length,
        support_spacing: round_down_spacing(support),
        mid_spacing: round_down_spacing(mid),
    })
}

/// Everything needed to detail one designed beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailingInput {
    pub b: f64,
    pub overall_depth: f64,
    pub d: f64,
    pub cover: f64,
    pub stirrup_dia: f64,
    pub fck: f64,
    pub fy: f64,
    /// Main tension bar diameter (mm)
    pub bar_dia: f64,
    /// Bars in the fullest tension layer
    pub bars_per_layer: u32,
    /// Compression bar diameter when compression steel is provided (mm)
    pub compression_dia: Option<f64>,
    pub span: f64,
    /// Governing stirrup spacing from shear or torsion design (mm)
    pub design_spacing: f64,
    /// Minimum-reinforcement stirrup spacing (mm)
    pub nominal_spacing: f64,
    pub has_torsion: bool,
    pub surface: BarSurface,
    pub splice_percent: f64,
    pub seismic: bool,
    pub aggregate_size: f64,
    pub side_face_dia: f64,
}

/// Detailing of one beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailingResult {
    /// Ld of the tension bars (mm)
    pub ld_tension: f64,
    /// Ld of the compression bars, when present (mm)
    pub ld_compression: Option<f64>,
    /// Lap length of the tension bars (mm)
    pub lap_length: f64,
    /// Centre-to-centre spacing of the tension bars (mm)
    pub bar_spacing_cc: f64,
    pub clear_spacing: f64,
    pub min_clear_spacing: f64,
    pub spacing_ok: bool,
    pub side_face: SideFaceSteel,
    pub stirrup_legs: u32,
    pub stirrup_dia: f64,
    pub zones: StirrupZones,
}

impl DetailingResult {
    /// Support-zone stirrup callout, e.g. `2L-8φ@150 c/c`
    pub fn stirrup_callout(&self) -> String {
        format!(
            "{}L-{}φ@{} c/c",
            self.stirrup_legs,
            self.stirrup_dia.round() as i64,
            self.zones.support_spacing.round() as i64
        )
    }
}

/// Detail a designed beam.
pub fn detail(tables: &CodeTables, input: &DetailingInput) -> CalcResult<DetailingResult> {
    let ld_tension = development_length(tables, input.bar_dia, input.fy, input.fck, input.surface, BarStress::Tension)?;
    let ld_compression = input
        .compression_dia
        .map(|dia| development_length(tables, dia, input.fy, input.fck, input.surface, BarStress::Compression))
        .transpose()?;
    let lap = lap_length(ld_tension, input.splice_percent, input.seismic, BarStress::Tension)?;

    let bar_spacing = bar_spacing_cc(input.b, input.cover, input.stirrup_dia, input.bar_dia, input.bars_per_layer.max(2))?;
    let clear_spacing = bar_spacing - input.bar_dia;
    let min_clear = min_clear_spacing(input.bar_dia, input.aggregate_size);
    let spacing_ok = check_min_spacing(clear_spacing, input.bar_dia, input.aggregate_size);

    let side_face = side_face_reinforcement(input.overall_depth, input.b, input.cover, input.side_face_dia)?;

    let min_main_dia = input.compression_dia.map_or(input.bar_dia, |c| c.min(input.bar_dia));
    let zones = stirrup_zones(&ZoneInput {
        d: input.d,
        span: input.span,
        design_spacing: input.design_spacing,
        nominal_spacing: input.nominal_spacing,
        min_main_dia,
        seismic: input.seismic,
        has_torsion: input.has_torsion,
    })?;

    debug!(
        ld_tension,
        lap,
        bar_spacing,
        support_spacing = zones.support_spacing,
        mid_spacing = zones.mid_spacing,
        clause = clauses::DEVELOPMENT_LENGTH,
        "detailing computed"
    );

    Ok(DetailingResult {
        ld_tension,
        ld_compression,
        lap_length: lap,
        bar_spacing_cc: bar_spacing,
        clear_spacing,
        min_clear_spacing: min_clear,
        spacing_ok,
        side_face,
        stirrup_legs: stirrup_legs(input.b),
        stirrup_dia: input.stirrup_dia,
        zones,
    })
}
