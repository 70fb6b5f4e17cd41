//! # Materials
//!
//! Concrete and reinforcing steel properties per IS 456:2000.
//!
//! Grades are carried as plain strengths in N/mm² (`fck = 25.0` for M25,
//! `fy = 500.0` for Fe500) so adapters can pass values straight through. The
//! helpers here turn them into labels and the strain-compatibility constants
//! used by flexural design.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::materials::{concrete_label, steel_label, xu_max_ratio};
//!
//! assert_eq!(concrete_label(25.0), "M25");
//! assert_eq!(steel_label(500.0), "Fe500");
//! assert_eq!(xu_max_ratio(415.0), 0.48);
//! ```

pub mod rebar;

pub use rebar::{
    bar_area, bars_area, is_standard_diameter, BarStress, BarSurface, MAIN_BAR_DIAMETERS,
    STANDARD_DIAMETERS,
};

/// Modulus of elasticity of reinforcing steel, Es (N/mm²)
pub const ES_STEEL: f64 = 200_000.0;

/// Ultimate compressive strain in concrete in flexure
pub const CONCRETE_ULTIMATE_STRAIN: f64 = 0.0035;

/// Partial safety factor applied to steel: design stress = 0.87·fy
pub const STEEL_DESIGN_FACTOR: f64 = 0.87;

/// Display label for a concrete grade, e.g. `M25`
pub fn concrete_label(fck: f64) -> String {
    format!("M{}", fck.round() as i64)
}

/// Display label for a steel grade, e.g. `Fe500`
pub fn steel_label(fy: f64) -> String {
    format!("Fe{}", fy.round() as i64)
}

/// Design yield stress 0.87·fy (N/mm²)
#[inline]
pub fn steel_design_stress(fy: f64) -> f64 {
    STEEL_DESIGN_FACTOR * fy
}

/// Limiting neutral-axis depth ratio xu,max/d.
///
/// Uses the tabulated values of IS 456 38.1 (note) for the three standard
/// grades and the strain-compatibility expression
/// `0.0035 / (0.0055 + 0.87·fy/Es)` for anything else.
pub fn xu_max_ratio(fy: f64) -> f64 {
    if (fy - 250.0).abs() < 0.5 {
        0.53
    } else if (fy - 415.0).abs() < 0.5 {
        0.48
    } else if (fy - 500.0).abs() < 0.5 {
        0.46
    } else {
        CONCRETE_ULTIMATE_STRAIN / (0.0055 + steel_design_stress(fy) / ES_STEEL)
    }
}
