//! # Bar Arrangement Selector
//!
//! Turns a required steel area into a buildable set of main bars: a diameter,
//! a count, and a number of layers that fits inside the stirrups with the
//! IS 456 26.3.2 clear spacing.
//!
//! ## Search
//!
//! Candidates are the standard main-bar diameters in ascending order (smaller
//! bars first), with an optional preferred diameter tried before them. For a
//! diameter φ and `n` layers:
//!
//! ```text
//! count          = max(2, ceil(Ast/Aφ), 2n)
//! bars per layer = ceil(count / n)
//! available      = b − 2(cover + φs) − φ
//! min clear      = max(φ, aggregate + 5, 25)
//! max per layer  = floor(available / (φ + min clear)) + 1
//! ```
//!
//! The escalation order when a candidate does not fit is an explicit
//! [`EscalationPolicy`]. The default, [`EscalationPolicy::DiameterFirst`],
//! tries every diameter in one layer before adding a second layer. When no
//! combination fits within `max_layers`, the largest candidate is returned in
//! `max_layers` layers with `spacing_ok = false`.
//!
//! The selected area is never below the required area and never fewer than
//! two bars.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::arrangement::{select, SelectorOptions};
//! use rcbeam_core::tables::tables;
//!
//! let bars = select(tables(), 575.0, 230.0, 25.0, 8.0, &SelectorOptions::default()).unwrap();
//! assert_eq!(bars.callout(), "3-16φ");
//! assert!(bars.area_provided >= 575.0);
//! assert!(bars.spacing_ok);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clauses;
use crate::errors::{require_positive_dimension, CalcError, CalcResult};
use crate::materials::MAIN_BAR_DIAMETERS;
use crate::tables::CodeTables;

/// Absolute minimum clear distance between bars (mm)
pub const MIN_CLEAR_SPACING_MM: f64 = 25.0;

/// Default nominal maximum aggregate size (mm)
pub const DEFAULT_AGGREGATE_SIZE: f64 = 20.0;

/// Most layers of main bars the selector will stack
pub const MAX_LAYERS: u32 = 4;

/// Most bars of one diameter the selector will lay out
pub const MAX_BAR_COUNT: u32 = 250;

/// Minimum clear spacing between parallel bars, max(φ, agg + 5, 25) in mm.
#[inline]
pub fn min_clear_spacing(diameter: f64, aggregate_size: f64) -> f64 {
    diameter.max(aggregate_size + 5.0).max(MIN_CLEAR_SPACING_MM)
}

/// Order in which the selector escalates when a candidate does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EscalationPolicy {
    /// Try every larger diameter in the current layer count before adding a layer
    #[default]
    DiameterFirst,
    /// Try every layer count for a diameter before moving to a larger diameter
    LayerFirst,
}

/// Tuning for the selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorOptions {
    /// Diameter tried before the standard candidates (mm)
    pub preferred_dia: Option<f64>,
    /// Maximum number of bar layers
    pub max_layers: u32,
    /// Nominal maximum aggregate size (mm)
    pub aggregate_size: f64,
    /// Escalation order
    pub policy: EscalationPolicy,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        SelectorOptions {
            preferred_dia: None,
            max_layers: 2,
            aggregate_size: DEFAULT_AGGREGATE_SIZE,
            policy: EscalationPolicy::DiameterFirst,
        }
    }
}

impl SelectorOptions {
    pub fn with_policy(mut self, policy: EscalationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_preferred_dia(mut self, dia: f64) -> Self {
        self.preferred_dia = Some(dia);
        self
    }

    pub fn with_max_layers(mut self, layers: u32) -> Self {
        self.max_layers = layers;
        self
    }
}

/// A selected group of main bars.
///
/// ## JSON Example
///
/// ```json
/// {
///   "count": 3, "diameter": 16.0, "area_provided": 603.19,
///   "layers": 1, "bars_per_layer": 3, "max_bars_per_layer": 4,
///   "spacing": 74.0, "clear_spacing": 58.0, "min_clear_spacing": 25.0,
///   "spacing_ok": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarArrangement {
    /// Total number of bars
    pub count: u32,
    /// Bar diameter (mm)
    pub diameter: f64,
    /// Total area of the bars (mm²)
    pub area_provided: f64,
    /// Number of layers
    pub layers: u32,
    /// Bars in the fullest layer
    pub bars_per_layer: u32,
    /// Most bars one layer can hold at minimum clear spacing
    pub max_bars_per_layer: u32,
    /// Centre-to-centre spacing within a layer (mm)
    pub spacing: f64,
    /// Clear spacing within a layer (mm)
    pub clear_spacing: f64,
    /// Required minimum clear spacing (mm)
    pub min_clear_spacing: f64,
    /// Whether the clearance check passes
    pub spacing_ok: bool,
}

impl BarArrangement {
    /// Bar callout, e.g. `3-16φ`
    pub fn callout(&self) -> String {
        format!("{}-{}φ", self.count, self.diameter.round() as i64)
    }

    /// Callout with the layer count when more than one layer is used
    pub fn describe(&self) -> String {
        if self.layers > 1 {
            format!("{} in {} layers", self.callout(), self.layers)
        } else {
            self.callout()
        }
    }

    /// Clearance failure text, if any
    pub fn spacing_remark(&self) -> Option<String> {
        if self.spacing_ok {
            return None;
        }
        Some(format!(
            "{}: clear spacing {:.0}mm < min {:.0}mm ({})",
            self.callout(),
            self.clear_spacing,
            self.min_clear_spacing,
            clauses::BAR_SPACING
        ))
    }
}

/// Select a bar arrangement for `ast_required` mm².
///
/// # Arguments
///
/// * `tables` - Code tables (standard bar areas)
/// * `ast_required` - Required area (mm²), zero or positive
/// * `b` - Beam width (mm)
/// * `cover` - Clear cover to stirrups (mm)
/// * `stirrup_dia` - Stirrup diameter (mm)
/// * `options` - Preferred diameter, layer limit, aggregate size, escalation policy
///
/// # Errors
///
/// * `Configuration` - negative/NaN area, area above [`max_selectable_area`],
///   layers outside 1..=[`MAX_LAYERS`], non-standard preferred diameter,
///   non-positive aggregate size
/// * `Dimension` - no clear width inside the stirrups
pub fn select(
    tables: &CodeTables,
    ast_required: f64,
    b: f64,
    cover: f64,
    stirrup_dia: f64,
    options: &SelectorOptions,
) -> CalcResult<BarArrangement> {
    if !ast_required.is_finite() || ast_required < 0.0 {
        return Err(CalcError::configuration(
            "ast_required",
            ast_required,
            "Required area must be a non-negative number",
        ));
    }
    validate_max_layers(options.max_layers)?;
    if !options.aggregate_size.is_finite() || options.aggregate_size <= 0.0 {
        return Err(CalcError::configuration(
            "aggregate_size",
            options.aggregate_size,
            "Aggregate size must be positive",
        ));
    }
    require_positive_dimension("b", b)?;
    require_positive_dimension("stirrup_dia", stirrup_dia)?;
    if !cover.is_finite() || cover < 0.0 {
        return Err(CalcError::dimension("cover", cover, "Cover must be non-negative"));
    }
    let inner_width = b - 2.0 * (cover + stirrup_dia);
    if inner_width <= 0.0 {
        return Err(CalcError::dimension("b", b, "No clear width inside the stirrups"));
    }

    let candidates = candidate_diameters(tables, options.preferred_dia)?;
    let limit = largest_area(&candidates)? * MAX_BAR_COUNT as f64;
    if ast_required > limit {
        return Err(CalcError::configuration(
            "ast_required",
            ast_required,
            format!("Required area exceeds {:.0} mm², the largest practical arrangement", limit),
        ));
    }

    let per_diameter = options.max_layers as usize;
    let trials = (0..candidates.len() * per_diameter).map(|i| match options.policy {
        EscalationPolicy::DiameterFirst => {
            let (dia, area) = candidates[i % candidates.len()];
            (dia, area, (i / candidates.len()) as u32 + 1)
        }
        EscalationPolicy::LayerFirst => {
            let (dia, area) = candidates[i / per_diameter];
            (dia, area, (i % per_diameter) as u32 + 1)
        }
    });

    for (dia, area, layers) in trials {
        let candidate = layout(ast_required, inner_width, dia, area, layers, options.aggregate_size);
        if candidate.spacing_ok {
            debug!(
                ast_required,
                callout = %candidate.callout(),
                layers,
                "bar arrangement selected"
            );
            return Ok(candidate);
        }
    }

    // Nothing fits: report the largest bars with the failing clearance check
    let &(dia, area) = candidates
        .iter()
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .ok_or_else(|| CalcError::configuration("candidates", "[]", "No candidate diameters"))?;
    let fallback = layout(ast_required, inner_width, dia, area, options.max_layers, options.aggregate_size);
    warn!(
        ast_required,
        b,
        callout = %fallback.callout(),
        clear_spacing = fallback.clear_spacing,
        "no bar arrangement satisfies spacing"
    );
    Ok(fallback)
}

/// Largest area [`select`] will arrange with these options (mm²).
pub fn max_selectable_area(tables: &CodeTables, options: &SelectorOptions) -> CalcResult<f64> {
    let candidates = candidate_diameters(tables, options.preferred_dia)?;
    Ok(largest_area(&candidates)? * MAX_BAR_COUNT as f64)
}

/// Reject layer limits outside 1..=[`MAX_LAYERS`].
pub fn validate_max_layers(max_layers: u32) -> CalcResult<()> {
    if max_layers == 0 || max_layers > MAX_LAYERS {
        return Err(CalcError::configuration(
            "max_layers",
            max_layers,
            format!("Layers must be between 1 and {}", MAX_LAYERS),
        ));
    }
    Ok(())
}

fn largest_area(candidates: &[(f64, f64)]) -> CalcResult<f64> {
    candidates
        .iter()
        .map(|&(_, area)| area)
        .max_by(|a, b| a.total_cmp(b))
        .ok_or_else(|| CalcError::configuration("candidates", "[]", "No candidate diameters"))
}

/// Candidate (diameter, area) pairs in search order.
fn candidate_diameters(tables: &CodeTables, preferred: Option<f64>) -> CalcResult<Vec<(f64, f64)>> {
    let mut out = Vec::with_capacity(MAIN_BAR_DIAMETERS.len() + 1);
    if let Some(p) = preferred {
        let area = tables.standard_bar_area(p).ok_or_else(|| {
            CalcError::configuration("preferred_dia", p, "Not a standard bar diameter")
        })?;
        out.push((p, area));
    }
    for &dia in MAIN_BAR_DIAMETERS.iter() {
        if out.iter().any(|(d, _)| (d - dia).abs() < 0.01) {
            continue;
        }
        let area = tables
            .standard_bar_area(dia)
            .ok_or_else(|| CalcError::configuration("diameter", dia, "Missing from bar-area table"))?;
        out.push((dia, area));
    }
    Ok(out)
}

/// Lay out bars of one diameter in `layers` layers and run the clearance check.
fn layout(ast_required: f64, inner_width: f64, dia: f64, bar_area: f64, layers: u32, aggregate_size: f64) -> BarArrangement {
    // Bounded by MAX_BAR_COUNT times the largest bar area, so the cast cannot saturate
    let min_count = 2u32.max(layers.saturating_mul(2)) as f64;
    let mut count = (ast_required / bar_area).ceil().max(min_count) as u32;
    while (count as f64) * bar_area < ast_required {
        count = count.saturating_add(1);
    }
    let bars_per_layer = count.div_ceil(layers);

    let available = inner_width - dia;
    let min_clear = min_clear_spacing(dia, aggregate_size);
    let max_bars_per_layer = if available < 0.0 {
        0
    } else {
        (available / (dia + min_clear)).floor() as u32 + 1
    };

    let spacing = if bars_per_layer > 1 {
        available / (bars_per_layer - 1) as f64
    } else {
        available
    };
    let clear_spacing = spacing - dia;
    let spacing_ok = bars_per_layer <= max_bars_per_layer && clear_spacing >= min_clear - 1e-9;

    BarArrangement {
        count,
        diameter: dia,
        area_provided: count as f64 * bar_area,
        layers,
        bars_per_layer,
        max_bars_per_layer,
        spacing,
        clear_spacing,
        min_clear_spacing: min_clear,
        spacing_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::bar_area;
    use crate::tables::tables;
    use approx::assert_relative_eq;

    fn pick(ast: f64, b: f64, options: &SelectorOptions) -> BarArrangement {
        select(tables(), ast, b, 25.0, 8.0, options).unwrap()
    }

    #[test]
    fn test_worked_beam_selects_three_16() {
        let bars = pick(575.0, 230.0, &SelectorOptions::default());
        assert_eq!(bars.count, 3);
        assert_eq!(bars.diameter, 16.0);
        assert_eq!(bars.layers, 1);
        assert_relative_eq!(bars.area_provided, 603.19, epsilon = 0.01);
        assert_relative_eq!(bars.spacing, 74.0);
        assert_relative_eq!(bars.clear_spacing, 58.0);
        assert!(bars.spacing_ok);
        assert!(bars.spacing_remark().is_none());
    }

    #[test]
    fn test_smaller_bars_preferred_when_they_fit() {
        let bars = pick(467.0, 230.0, &SelectorOptions::default());
        assert_eq!(bars.callout(), "5-12φ");
        assert_eq!(bars.max_bars_per_layer, 5);
        assert!(bars.clear_spacing >= 25.0);
    }

    #[test]
    fn test_never_fewer_than_two_bars() {
        let bars = pick(0.0, 230.0, &SelectorOptions::default());
        assert_eq!(bars.count, 2);
        assert_eq!(bars.diameter, 12.0);
        let bars = pick(50.0, 300.0, &SelectorOptions::default());
        assert_eq!(bars.count, 2);
    }

    #[test]
    fn test_second_layer_after_all_diameters() {
        let bars = pick(2500.0, 230.0, &SelectorOptions::default());
        assert_eq!(bars.callout(), "8-20φ");
        assert_eq!(bars.layers, 2);
        assert_eq!(bars.bars_per_layer, 4);
        assert!(bars.spacing_ok);
        assert_eq!(bars.describe(), "8-20φ in 2 layers");
    }

    #[test]
    fn test_escalation_policy_is_pinned() {
        // Diameter-first finds 4-20φ in one layer before trying two layers
        let diameter_first = pick(1000.0, 230.0, &SelectorOptions::default());
        assert_eq!(diameter_first.callout(), "4-20φ");
        assert_eq!(diameter_first.layers, 1);

        // Layer-first keeps 12φ and stacks it in two layers
        let layer_first = pick(1000.0, 230.0, &SelectorOptions::default().with_policy(EscalationPolicy::LayerFirst));
        assert_eq!(layer_first.callout(), "9-12φ");
        assert_eq!(layer_first.layers, 2);
        assert_eq!(layer_first.bars_per_layer, 5);
    }

    #[test]
    fn test_preferred_diameter_tried_first() {
        let bars = pick(575.0, 230.0, &SelectorOptions::default().with_preferred_dia(20.0));
        assert_eq!(bars.callout(), "2-20φ");
    }

    #[test]
    fn test_fallback_reports_failure() {
        let options = SelectorOptions::default();
        let bars = pick(3000.0, 150.0, &options);
        assert!(!bars.spacing_ok);
        assert_eq!(bars.diameter, 32.0);
        assert_eq!(bars.layers, options.max_layers);
        assert!(bars.area_provided >= 3000.0);
        assert!(bars.spacing_remark().unwrap().contains("clear spacing"));
    }

    #[test]
    fn test_selection_is_deterministic() {
        for &ast in &[150.0, 575.0, 1000.0, 2500.0, 6000.0] {
            for policy in [EscalationPolicy::DiameterFirst, EscalationPolicy::LayerFirst] {
                let options = SelectorOptions::default().with_policy(policy);
                assert_eq!(pick(ast, 300.0, &options), pick(ast, 300.0, &options));
            }
        }
    }

    #[test]
    fn test_area_and_count_postconditions() {
        for &b in &[200.0, 230.0, 300.0, 450.0, 600.0] {
            for i in 0..60 {
                let ast = i as f64 * 97.3;
                for policy in [EscalationPolicy::DiameterFirst, EscalationPolicy::LayerFirst] {
                    let bars = pick(ast, b, &SelectorOptions::default().with_policy(policy));
                    assert!(bars.area_provided >= ast, "b={} ast={}", b, ast);
                    assert!(bars.count >= 2);
                    assert_relative_eq!(bars.area_provided, bars.count as f64 * bar_area(bars.diameter), max_relative = 1e-12);
                    if bars.spacing_ok {
                        assert!(bars.bars_per_layer <= bars.max_bars_per_layer);
                        assert!(bars.clear_spacing >= bars.min_clear_spacing - 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_exact_multiple_of_bar_area() {
        let ast = 3.0 * bar_area(16.0);
        let bars = pick(ast, 230.0, &SelectorOptions::default().with_preferred_dia(16.0));
        assert!(bars.area_provided >= ast);
        assert_eq!(bars.count, 3);
    }

    #[test]
    fn test_min_clear_spacing_rule() {
        assert_eq!(min_clear_spacing(12.0, 20.0), 25.0);
        assert_eq!(min_clear_spacing(32.0, 20.0), 32.0);
        assert_eq!(min_clear_spacing(16.0, 25.0), 30.0);
    }

    #[test]
    fn test_contract_violations() {
        let opts = SelectorOptions::default();
        let err = select(tables(), -1.0, 230.0, 25.0, 8.0, &opts).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        let err = select(tables(), 500.0, 230.0, 25.0, 8.0, &opts.clone().with_max_layers(0)).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        let err = select(tables(), 500.0, 60.0, 25.0, 8.0, &opts).unwrap_err();
        assert_eq!(err.error_code(), "DIMENSION_ERROR");
        let err = select(tables(), 500.0, 230.0, 25.0, 8.0, &opts.clone().with_preferred_dia(14.0)).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_huge_area_is_rejected_not_overflowed() {
        let opts = SelectorOptions::default();
        let limit = max_selectable_area(tables(), &opts).unwrap();
        assert_relative_eq!(limit, MAX_BAR_COUNT as f64 * bar_area(32.0));

        let err = select(tables(), 1.0e13, 230.0, 25.0, 8.0, &opts).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");

        // Right at the limit the fallback still covers the area
        let bars = pick(limit, 230.0, &opts);
        assert!(!bars.spacing_ok);
        assert!(bars.area_provided >= limit);
        assert!(bars.count <= MAX_BAR_COUNT + 1);
    }

    #[test]
    fn test_layer_limit() {
        let opts = SelectorOptions::default();
        let err = select(tables(), 500.0, 230.0, 25.0, 8.0, &opts.clone().with_max_layers(1_000_000_000)).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        let err = select(tables(), 500.0, 230.0, 25.0, 8.0, &opts.clone().with_max_layers(MAX_LAYERS + 1)).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");

        let bars = pick(6000.0, 300.0, &opts.with_max_layers(MAX_LAYERS));
        assert!(bars.layers <= MAX_LAYERS);
        assert!(bars.area_provided >= 6000.0);
    }
}
