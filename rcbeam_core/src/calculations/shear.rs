//! # Shear Design (IS 456 40)
//!
//! Vertical stirrup design for a rectangular section.
//!
//! ```text
//! τv = Vu / (b·d)
//! τv > τc,max          → section too small (is_safe = false)
//! τc < τv ≤ τc,max     → sv = 0.87·fy·Asv·d / ((τv − τc)·b·d)
//! always               → sv ≤ 0.87·fy·Asv / (0.4·b)     (minimum stirrups)
//! sv ≤ min(0.75·d, 300 mm)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::calculations::shear::{design, ShearInput};
//! use rcbeam_core::materials::bar_area;
//! use rcbeam_core::tables::tables;
//!
//! let asv = 2.0 * bar_area(8.0);
//! let input = ShearInput::new(75.0, 230.0, 410.0, 25.0, 500.0, asv, 0.5);
//! let result = design(tables(), &input).unwrap();
//!
//! assert!(result.is_safe);
//! assert!(result.design_governs);
//! assert!(result.accepts_spacing(150.0));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clauses;
use crate::errors::{require_positive_dimension, require_positive_strength, CalcError, CalcResult};
use crate::materials::steel_design_stress;
use crate::tables::CodeTables;

/// Absolute cap on stirrup spacing (mm)
pub const MAX_STIRRUP_SPACING_MM: f64 = 300.0;

/// Maximum stirrup spacing min(0.75·d, 300 mm)
#[inline]
pub fn max_stirrup_spacing(d: f64) -> f64 {
    (0.75 * d).min(MAX_STIRRUP_SPACING_MM)
}

/// Spacing of minimum shear reinforcement, 0.87·fy·Asv/(0.4·b) (mm)
#[inline]
pub fn nominal_stirrup_spacing(asv: f64, b: f64, fy: f64) -> f64 {
    steel_design_stress(fy) * asv / (0.4 * b)
}

/// Which limit fixed the stirrup spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SpacingRule {
    /// Stirrups designed for Vus
    Design,
    /// Minimum shear reinforcement
    #[default]
    Minimum,
    /// min(0.75d, 300 mm)
    Cap,
}

impl SpacingRule {
    pub fn clause(&self) -> &'static str {
        match self {
            SpacingRule::Design => clauses::SHEAR_REINFORCEMENT,
            SpacingRule::Minimum => clauses::MIN_SHEAR_REINFORCEMENT,
            SpacingRule::Cap => clauses::MAX_STIRRUP_SPACING,
        }
    }
}

/// Input parameters for shear design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearInput {
    /// Factored shear Vu (kN); sign is ignored
    pub vu: f64,
    /// Width b (mm)
    pub b: f64,
    /// Effective depth d (mm)
    pub d: f64,
    /// Concrete grade fck (N/mm²)
    pub fck: f64,
    /// Stirrup steel grade fy (N/mm²)
    pub fy: f64,
    /// Area of all stirrup legs at one section, Asv (mm²)
    pub asv: f64,
    /// Tension steel percentage used for τc
    pub pt: f64,
}

impl ShearInput {
    pub fn new(vu: f64, b: f64, d: f64, fck: f64, fy: f64, asv: f64, pt: f64) -> Self {
        ShearInput { vu, b, d, fck, fy, asv, pt }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.vu.is_finite() {
            return Err(CalcError::configuration("Vu", self.vu, "Shear must be a finite number"));
        }
        require_positive_dimension("b", self.b)?;
        require_positive_dimension("d", self.d)?;
        require_positive_dimension("asv", self.asv)?;
        require_positive_strength("fck", self.fck)?;
        require_positive_strength("fy", self.fy)?;
        Ok(())
    }
}

/// Results of shear design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    /// Nominal shear stress τv (N/mm²)
    pub tau_v: f64,
    /// Design shear strength of concrete τc (N/mm²)
    pub tau_c: f64,
    /// Maximum shear stress τc,max (N/mm²)
    pub tau_c_max: f64,
    /// Shear carried by stirrups Vus (kN); zero when minimum stirrups govern
    pub vus: f64,
    /// Stirrup leg area used (mm²)
    pub asv: f64,
    /// Required stirrup spacing, capped (mm)
    pub spacing: f64,
    /// Cap applied, min(0.75d, 300) (mm)
    pub max_spacing: f64,
    /// True when τv > τc and stirrups are designed for Vus
    pub design_governs: bool,
    /// Limit that fixed `spacing`
    #[serde(default)]
    pub spacing_rule: SpacingRule,
    pub is_safe: bool,
    /// Failure description when not safe
    pub message: Option<String>,
}

impl ShearResult {
    /// Whether a provided spacing satisfies this design.
    pub fn accepts_spacing(&self, provided_mm: f64) -> bool {
        self.is_safe && provided_mm > 0.0 && provided_mm <= self.spacing + 1e-9
    }

    /// Shear utilisation τv/τc,max
    pub fn stress_ratio(&self) -> f64 {
        self.tau_v / self.tau_c_max
    }
}

/// Design vertical stirrups for shear.
///
/// # Returns
///
/// * `Ok(ShearResult)` - `is_safe = false` when τv exceeds τc,max
/// * `Err(CalcError)` - Invalid geometry, grade or stirrup area
pub fn design(tables: &CodeTables, input: &ShearInput) -> CalcResult<ShearResult> {
    input.validate()?;

    let ShearInput { b, d, fck, fy, asv, pt, .. } = *input;
    let vu_n = input.vu.abs() * 1000.0;

    let tau_v = vu_n / (b * d);
    let tau_c = tables.shear_strength(fck, pt)?;
    let tau_c_max = tables.max_shear_stress(fck)?;
    let max_spacing = max_stirrup_spacing(d);

    let mut message = None;
    if tau_v > tau_c_max {
        message = Some(format!(
            "Shear failure: τv {:.2} > τc,max {:.2} N/mm² ({}) - increase section",
            tau_v,
            tau_c_max,
            clauses::MAX_SHEAR_STRESS
        ));
    }

    let design_governs = tau_v > tau_c;
    let minimum_spacing = nominal_stirrup_spacing(asv, b, fy);
    let (vus_n, design_spacing) = if design_governs {
        let vus_n = (tau_v - tau_c) * b * d;
        (vus_n, steel_design_stress(fy) * asv * d / vus_n)
    } else {
        (0.0, f64::INFINITY)
    };

    // Minimum stirrups apply whether or not τv exceeds τc
    let (mut spacing, mut spacing_rule) = if design_spacing < minimum_spacing {
        (design_spacing, SpacingRule::Design)
    } else {
        (minimum_spacing, SpacingRule::Minimum)
    };
    if max_spacing < spacing {
        spacing = max_spacing;
        spacing_rule = SpacingRule::Cap;
    }
    let is_safe = message.is_none();

    debug!(
        tau_v,
        tau_c,
        tau_c_max,
        spacing,
        design_governs,
        is_safe,
        clause = spacing_rule.clause(),
        "shear designed"
    );

    Ok(ShearResult {
        tau_v,
        tau_c,
        tau_c_max,
        vus: vus_n / 1000.0,
        asv,
        spacing,
        max_spacing,
        design_governs,
        spacing_rule,
        is_safe,
        message,
    })
}
