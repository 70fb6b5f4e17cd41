//! # Torsion Design (IS 456 41)
//!
//! Combined torsion + shear design using the equivalent shear and equivalent
//! moment of IS 456 41.3–41.4.
//!
//! ```text
//! Ve   = |Vu| + 1.6·|Tu|/b                       (kN, Tu in kN·m, b in m)
//! Me   = |Mu| + |Tu|·(1 + D/b)/1.7               (kN·m)
//! τve  = Ve/(b·d)                                compared with τc,max
//! Asv/sv = Tu/(b1·d1·0.87fy) + max(Vu − τc·b·d, 0)/(0.87fy·d)
//!        ≥ (τve − τc)·b/(0.87fy)
//! Al   = Tu·(b1 + d1)/(b1·d1·0.87fy)
//! ```
//!
//! `b1`/`d1` are measured inside the stirrup legs. Torsion stirrups are always
//! closed; spacing uses the two legs of the outer hoop.
//!
//! An over-stressed section (τve > τc,max) is returned as data with
//! `is_safe = false`; only non-physical inputs produce an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::shear::{max_stirrup_spacing, MAX_STIRRUP_SPACING_MM};
use crate::clauses;
use crate::errors::{require_positive_dimension, require_positive_strength, CalcError, CalcResult};
use crate::materials::{bar_area, steel_design_stress};
use crate::tables::CodeTables;

/// Legs of a closed torsion hoop that resist torsion
const TORSION_HOOP_LEGS: f64 = 2.0;

/// Equivalent shear Ve (kN) for Vu in kN, Tu in kN·m and b in mm.
#[inline]
pub fn equivalent_shear(vu: f64, tu: f64, b: f64) -> f64 {
    vu.abs() + 1.6 * tu.abs() * 1000.0 / b
}

/// Equivalent moment Me (kN·m) for D and b in mm.
#[inline]
pub fn equivalent_moment(mu: f64, tu: f64, overall_depth: f64, b: f64) -> f64 {
    mu.abs() + tu.abs() * (1.0 + overall_depth / b) / 1.7
}

/// Input parameters for torsion design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorsionInput {
    /// Factored torsion Tu (kN·m)
    pub tu: f64,
    /// Factored shear Vu (kN)
    pub vu: f64,
    /// Factored moment Mu (kN·m)
    pub mu: f64,
    /// Width b (mm)
    pub b: f64,
    /// Overall depth D (mm)
    pub overall_depth: f64,
    /// Effective depth d (mm)
    pub d: f64,
    pub fck: f64,
    pub fy: f64,
    /// Clear cover (mm)
    pub cover: f64,
    /// Stirrup diameter (mm)
    pub stirrup_dia: f64,
    /// Tension steel percentage for τc
    pub pt: f64,
}

impl TorsionInput {
    /// Width inside the stirrup legs, b1 (mm)
    pub fn b1(&self) -> f64 {
        self.b - 2.0 * (self.cover + self.stirrup_dia)
    }

    /// Depth inside the stirrup legs, d1 (mm)
    pub fn d1(&self) -> f64 {
        self.overall_depth - 2.0 * (self.cover + self.stirrup_dia)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, v) in [("Tu", self.tu), ("Vu", self.vu), ("Mu", self.mu)] {
            if !v.is_finite() {
                return Err(CalcError::configuration(field, v, "Force must be a finite number"));
            }
        }
        require_positive_dimension("b", self.b)?;
        require_positive_dimension("D", self.overall_depth)?;
        require_positive_dimension("d", self.d)?;
        if self.d >= self.overall_depth {
            return Err(CalcError::dimension(
                "d",
                self.d,
                format!("Effective depth must be less than overall depth D = {}", self.overall_depth),
            ));
        }
        if !self.cover.is_finite() || self.cover < 0.0 {
            return Err(CalcError::dimension("cover", self.cover, "Cover must be non-negative"));
        }
        require_positive_dimension("stirrup_dia", self.stirrup_dia)?;
        if self.b1() <= 0.0 {
            return Err(CalcError::dimension("b1", self.b1(), "No core width inside stirrup legs"));
        }
        if self.d1() <= 0.0 {
            return Err(CalcError::dimension("d1", self.d1(), "No core depth inside stirrup legs"));
        }
        require_positive_strength("fck", self.fck)?;
        require_positive_strength("fy", self.fy)?;
        Ok(())
    }
}

/// Results of combined torsion and shear design.
///
/// The `asv_*` fields are stirrup intensities Asv/sv in mm²/mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorsionResult {
    /// Equivalent shear (kN)
    pub ve: f64,
    /// Equivalent moment (kN·m)
    pub me: f64,
    /// Equivalent shear stress (N/mm²)
    pub tau_ve: f64,
    /// Design shear strength of concrete (N/mm²)
    pub tau_c: f64,
    /// Maximum shear stress (N/mm²)
    pub tau_c_max: f64,
    /// Torsion part of the stirrup intensity
    pub asv_torsion: f64,
    /// Shear part of the stirrup intensity
    pub asv_shear: f64,
    /// Governing stirrup intensity, including the 41.4.3 and 26.5.1.6 floors
    pub asv_total: f64,
    /// Longitudinal steel for torsion (mm²)
    pub al_torsion: f64,
    /// Spacing of the closed hoops (mm)
    pub stirrup_spacing: f64,
    /// Core dimensions used (mm)
    pub b1: f64,
    pub d1: f64,
    pub is_safe: bool,
    pub requires_closed_stirrups: bool,
    pub errors: Vec<String>,
}

/// Design closed stirrups and longitudinal steel for torsion with shear.
///
/// # Example
///
/// ```rust
/// use rcbeam_core::calculations::torsion::{design, TorsionInput};
/// use rcbeam_core::tables::tables;
///
/// let input = TorsionInput {
///     tu: 10.0, vu: 100.0, mu: 150.0,
///     b: 300.0, overall_depth: 500.0, d: 450.0,
///     fck: 25.0, fy: 500.0, cover: 25.0, stirrup_dia: 8.0, pt: 1.0,
/// };
/// let result = design(tables(), &input).unwrap();
/// assert!((result.ve - 153.33).abs() < 0.01);
/// assert!(result.is_safe);
/// assert!(result.stirrup_spacing <= 300.0);
/// ```
pub fn design(tables: &CodeTables, input: &TorsionInput) -> CalcResult<TorsionResult> {
    input.validate()?;

    let TorsionInput { b, overall_depth, d, fck, fy, stirrup_dia, pt, .. } = *input;
    let tu = input.tu.abs();
    let vu = input.vu.abs();
    let b1 = input.b1();
    let d1 = input.d1();
    let fyd = steel_design_stress(fy);

    let ve = equivalent_shear(vu, tu, b);
    let me = equivalent_moment(input.mu, tu, overall_depth, b);
    let tau_ve = ve * 1000.0 / (b * d);
    let tau_c = tables.shear_strength(fck, pt)?;
    let tau_c_max = tables.max_shear_stress(fck)?;

    let mut errors = Vec::new();
    if tau_ve > tau_c_max {
        errors.push(format!(
            "Torsion-shear failure: τve {:.2} > τc,max {:.2} N/mm² ({}) - increase section",
            tau_ve,
            tau_c_max,
            clauses::MAX_SHEAR_STRESS
        ));
    }

    let asv_torsion = tu * 1e6 / (b1 * d1 * fyd);
    let asv_shear = (vu * 1000.0 - tau_c * b * d).max(0.0) / (fyd * d);
    let asv_equivalent_min = ((tau_ve - tau_c) * b / fyd).max(0.0);
    let asv_nominal_min = 0.4 * b / fyd;
    let asv_total = (asv_torsion + asv_shear)
        .max(asv_equivalent_min)
        .max(asv_nominal_min);

    let al_torsion = tu * 1e6 * (b1 + d1) / (b1 * d1 * fyd);

    let hoop_area = TORSION_HOOP_LEGS * bar_area(stirrup_dia);
    let spacing_limit = max_stirrup_spacing(d)
        .min(b1)
        .min((b1 + d1) / 4.0)
        .min(MAX_STIRRUP_SPACING_MM);
    let stirrup_spacing = (hoop_area / asv_total).min(spacing_limit);

    let is_safe = errors.is_empty();
    debug!(
        ve,
        me,
        tau_ve,
        asv_total,
        al_torsion,
        stirrup_spacing,
        is_safe,
        clause = clauses::TORSION_STIRRUPS,
        spacing_clause = clauses::TORSION_STIRRUP_SPACING,
        "torsion designed"
    );

    Ok(TorsionResult {
        ve,
        me,
        tau_ve,
        tau_c,
        tau_c_max,
        asv_torsion,
        asv_shear,
        asv_total,
        al_torsion,
        stirrup_spacing,
        b1,
        d1,
        is_safe,
        requires_closed_stirrups: true,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::tables;
    use approx::assert_relative_eq;

    fn scenario() -> TorsionInput {
        TorsionInput {
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
            pt: 1.0,
        }
    }

    #[test]
    fn test_equivalent_forces() {
        assert_relative_eq!(equivalent_shear(100.0, 10.0, 300.0), 153.333, epsilon = 0.001);
        // Me = 150 + 10·(1 + 500/300)/1.7 = 165.686
        assert_relative_eq!(equivalent_moment(150.0, 10.0, 500.0, 300.0), 165.686, epsilon = 0.001);
        assert_relative_eq!(equivalent_shear(-100.0, -10.0, 300.0), 153.333, epsilon = 0.001);
    }

    #[test]
    fn test_torsion_scenario() {
        let result = design(tables(), &scenario()).unwrap();
        assert_relative_eq!(result.ve, 153.33, epsilon = 0.01);
        assert!(result.is_safe);
        assert!(result.errors.is_empty());
        assert!(result.requires_closed_stirrups);
        assert!(result.stirrup_spacing <= 300.0);
        assert!(result.al_torsion > 0.0);

        // b1 = 234, d1 = 434
        assert_relative_eq!(result.b1, 234.0);
        assert_relative_eq!(result.d1, 434.0);
        assert_relative_eq!(result.asv_torsion, 10e6 / (234.0 * 434.0 * 435.0), max_relative = 1e-9);
        assert_relative_eq!(result.al_torsion, 10e6 * 668.0 / (234.0 * 434.0 * 435.0), max_relative = 1e-9);
        // (b1 + d1)/4 = 167 governs the spacing
        assert_relative_eq!(result.stirrup_spacing, 167.0);
    }

    #[test]
    fn test_combined_intensity_floor() {
        let result = design(tables(), &scenario()).unwrap();
        assert!(result.asv_total >= result.asv_torsion + result.asv_shear - 1e-12);
        let floor = (result.tau_ve - result.tau_c) * 300.0 / 435.0;
        assert!(result.asv_total >= floor - 1e-12);
    }

    #[test]
    fn test_overstressed_section_is_data() {
        let mut input = scenario();
        input.tu = 120.0;
        input.vu = 300.0;
        let result = design(tables(), &input).unwrap();
        assert!(!result.is_safe);
        assert!(result.requires_closed_stirrups);
        assert_eq!(result.errors.len(), 1);
        assert!(result.tau_ve > result.tau_c_max);
    }

    #[test]
    fn test_invalid_geometry_and_material() {
        let mut input = scenario();
        input.b = 0.0;
        assert_eq!(design(tables(), &input).unwrap_err().error_code(), "DIMENSION_ERROR");

        let mut input = scenario();
        input.cover = 150.0; // leaves no core width
        assert_eq!(design(tables(), &input).unwrap_err().error_code(), "DIMENSION_ERROR");

        let mut input = scenario();
        input.fy = -415.0;
        assert_eq!(design(tables(), &input).unwrap_err().error_code(), "MATERIAL_ERROR");
    }

    #[test]
    fn test_spacing_capped_for_light_torsion() {
        let mut input = scenario();
        input.tu = 0.5;
        input.vu = 10.0;
        input.overall_depth = 1200.0;
        input.d = 1150.0;
        input.b = 450.0;
        let result = design(tables(), &input).unwrap();
        assert!(result.stirrup_spacing <= 300.0);
        assert!(result.stirrup_spacing <= 0.75 * 1150.0);
    }
}
