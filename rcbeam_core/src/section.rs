//! # Section and Force Model
//!
//! Plain immutable inputs to every design call. Units are fixed throughout the
//! engine: millimetres for lengths, N/mm² for strengths, kN for shear and
//! kN·m for moments and torsion. Adapters are responsible for normalising
//! foreign data into these units before calling in.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::section::{BeamSection, DesignForces};
//!
//! let section = BeamSection::new(230.0, 450.0, 410.0, 25.0, 8.0, 25.0, 500.0);
//! section.validate().unwrap();
//!
//! let forces = DesignForces::new(75.0, 75.0);
//! assert!(!forces.has_torsion());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive_dimension, require_positive_strength, CalcError, CalcResult};

/// Rectangular beam cross-section with its materials.
///
/// ## JSON Example
///
/// ```json
/// {
///   "b": 230.0,
///   "overall_depth": 450.0,
///   "d": 410.0,
///   "cover": 25.0,
///   "stirrup_dia": 8.0,
///   "fck": 25.0,
///   "fy": 500.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSection {
    /// Width b (mm)
    pub b: f64,
    /// Overall depth D (mm)
    pub overall_depth: f64,
    /// Effective depth d (mm), centroid of tension steel from compression face
    pub d: f64,
    /// Clear cover to stirrups (mm)
    pub cover: f64,
    /// Stirrup diameter (mm)
    pub stirrup_dia: f64,
    /// Characteristic concrete strength fck (N/mm²)
    pub fck: f64,
    /// Steel yield strength fy (N/mm²)
    pub fy: f64,
}

impl BeamSection {
    pub fn new(b: f64, overall_depth: f64, d: f64, cover: f64, stirrup_dia: f64, fck: f64, fy: f64) -> Self {
        BeamSection {
            b,
            overall_depth,
            d,
            cover,
            stirrup_dia,
            fck,
            fy,
        }
    }

    /// Validate geometry and material strengths.
    ///
    /// Contract violations only: this never judges code compliance.
    pub fn validate(&self) -> CalcResult<()> {
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
        require_positive_strength("fck", self.fck)?;
        require_positive_strength("fy", self.fy)?;
        Ok(())
    }

    /// Gross area b·D (mm²)
    pub fn gross_area(&self) -> f64 {
        self.b * self.overall_depth
    }

    /// Effective area b·d (mm²)
    pub fn effective_area(&self) -> f64 {
        self.b * self.d
    }

    /// Width between the inner faces of the stirrup legs, b − 2(cover + φs)
    pub fn inner_width(&self) -> f64 {
        self.b - 2.0 * (self.cover + self.stirrup_dia)
    }

    /// Depth between the inner faces of the stirrup legs, D − 2(cover + φs)
    pub fn inner_depth(&self) -> f64 {
        self.overall_depth - 2.0 * (self.cover + self.stirrup_dia)
    }

    /// Percentage of steel 100·As/(b·d)
    pub fn steel_percentage(&self, area_mm2: f64) -> f64 {
        100.0 * area_mm2 / self.effective_area()
    }

    /// Effective depth derived from cover, stirrup and an assumed main-bar diameter.
    pub fn derive_effective_depth(overall_depth: f64, cover: f64, stirrup_dia: f64, main_bar_dia: f64) -> f64 {
        overall_depth - cover - stirrup_dia - main_bar_dia / 2.0
    }
}

/// Factored design forces at the critical section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignForces {
    /// Factored bending moment Mu (kN·m)
    pub mu: f64,
    /// Factored shear Vu (kN)
    pub vu: f64,
    /// Factored torsion Tu (kN·m), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tu: Option<f64>,
}

impl DesignForces {
    pub fn new(mu: f64, vu: f64) -> Self {
        DesignForces { mu, vu, tu: None }
    }

    /// Builder-style torsion
    pub fn with_torsion(mut self, tu: f64) -> Self {
        self.tu = Some(tu);
        self
    }

    /// True when a non-zero torsion is present
    pub fn has_torsion(&self) -> bool {
        matches!(self.tu, Some(t) if t.abs() > f64::EPSILON)
    }

    /// Reject non-finite forces.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("Mu", Some(self.mu)), ("Vu", Some(self.vu)), ("Tu", self.tu)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CalcError::configuration(field, v, "Force must be a finite number"));
                }
            }
        }
        Ok(())
    }
}
