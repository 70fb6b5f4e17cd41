//! # Flexural Design (IS 456 Annex G)
//!
//! Designs a rectangular section for a factored moment using the limit-state
//! rectangular stress block.
//!
//! ## Method
//!
//! 1. Limiting moment `Mu,lim = 0.36·fck·b·xu,max·(d − 0.42·xu,max)`.
//! 2. `Mu ≤ Mu,lim` → singly reinforced:
//!    `Ast = (0.5·fck/fy)·[1 − √(1 − 4.6·Mu/(fck·b·d²))]·b·d`.
//! 3. `Mu > Mu,lim` → doubly reinforced. The excess `Mu − Mu,lim` is carried by
//!    a couple between compression steel at depth d' and extra tension steel:
//!    `Asc = (Mu − Mu,lim)/((fsc − 0.447·fck)(d − d'))`,
//!    `Ast = Ast,lim + Asc·(fsc − 0.447·fck)/(0.87·fy)`.
//! 4. Minimum steel `0.85·b·d/fy` governs small moments (flagged in `notes`);
//!    steel beyond `0.04·b·D` on either face makes the design unsafe.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::calculations::flexure::{design, FlexureInput, SectionType};
//! use rcbeam_core::tables::tables;
//!
//! let input = FlexureInput::new(230.0, 410.0, 450.0, 75.0, 25.0, 500.0);
//! let result = design(tables(), &input).unwrap();
//!
//! assert_eq!(result.section_type, SectionType::Singly);
//! assert_eq!(result.asc_required, 0.0);
//! assert!(result.is_safe);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clauses;
use crate::errors::{require_positive_dimension, require_positive_strength, CalcError, CalcResult};
use crate::materials::{steel_design_stress, xu_max_ratio};
use crate::section::BeamSection;
use crate::tables::CodeTables;

/// Compression-steel depth used when none is given (mm)
pub const DEFAULT_D_DASH: f64 = 50.0;

/// Minimum tension steel coefficient: As,min = 0.85·b·d/fy
const MIN_STEEL_COEFFICIENT: f64 = 0.85;

/// Maximum steel on either face as a fraction of b·D
const MAX_STEEL_RATIO: f64 = 0.04;

/// Reinforcement classification of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    /// Tension steel only (Mu ≤ Mu,lim)
    Singly,
    /// Tension and compression steel (Mu > Mu,lim)
    Doubly,
}

impl SectionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionType::Singly => "Singly Reinforced",
            SectionType::Doubly => "Doubly Reinforced",
        }
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Input parameters for flexural design.
///
/// ## JSON Example
///
/// ```json
/// { "b": 230.0, "d": 410.0, "overall_depth": 450.0, "mu": 75.0, "fck": 25.0, "fy": 500.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexureInput {
    /// Width b (mm)
    pub b: f64,
    /// Effective depth d (mm)
    pub d: f64,
    /// Overall depth D (mm)
    pub overall_depth: f64,
    /// Factored moment Mu (kN·m); sign is ignored
    pub mu: f64,
    /// Concrete grade fck (N/mm²)
    pub fck: f64,
    /// Steel grade fy (N/mm²)
    pub fy: f64,
    /// Depth of compression steel d' (mm); defaults to [`DEFAULT_D_DASH`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_dash: Option<f64>,
}

impl FlexureInput {
    pub fn new(b: f64, d: f64, overall_depth: f64, mu: f64, fck: f64, fy: f64) -> Self {
        FlexureInput {
            b,
            d,
            overall_depth,
            mu,
            fck,
            fy,
            d_dash: None,
        }
    }

    /// Flexure input for a section and moment
    pub fn from_section(section: &BeamSection, mu: f64) -> Self {
        FlexureInput::new(section.b, section.d, section.overall_depth, mu, section.fck, section.fy)
    }

    pub fn with_d_dash(mut self, d_dash: f64) -> Self {
        self.d_dash = Some(d_dash);
        self
    }

    /// Compression steel depth in effect
    pub fn effective_d_dash(&self) -> f64 {
        self.d_dash.unwrap_or(DEFAULT_D_DASH)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive_dimension("b", self.b)?;
        require_positive_dimension("d", self.d)?;
        require_positive_dimension("D", self.overall_depth)?;
        if self.d >= self.overall_depth {
            return Err(CalcError::dimension(
                "d",
                self.d,
                format!("Effective depth must be less than overall depth D = {}", self.overall_depth),
            ));
        }
        let d_dash = self.effective_d_dash();
        require_positive_dimension("d_dash", d_dash)?;
        if d_dash >= self.d {
            return Err(CalcError::dimension(
                "d_dash",
                d_dash,
                format!("Compression steel depth must be less than effective depth d = {}", self.d),
            ));
        }
        if !self.mu.is_finite() {
            return Err(CalcError::configuration("Mu", self.mu, "Moment must be a finite number"));
        }
        require_positive_strength("fck", self.fck)?;
        require_positive_strength("fy", self.fy)?;
        Ok(())
    }
}

/// Results of flexural design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "section_type": "Singly",
///   "mu": 75.0,
///   "mu_lim": 129.14,
///   "xu_max": 188.6,
///   "ast_required": 466.98,
///   "asc_required": 0.0,
///   "ast_min": 160.31,
///   "ast_max": 4140.0,
///   "pt": 0.495,
///   "is_safe": true,
///   "error_message": null,
///   "notes": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureResult {
    pub section_type: SectionType,

    /// Design moment magnitude (kN·m)
    pub mu: f64,

    /// Limiting moment of resistance (kN·m)
    pub mu_lim: f64,

    /// Limiting neutral-axis depth (mm)
    pub xu_max: f64,

    /// Required tension steel (mm²), never below `ast_min`
    pub ast_required: f64,

    /// Required compression steel (mm²); zero for singly reinforced sections
    pub asc_required: f64,

    /// Minimum tension steel 0.85·b·d/fy (mm²)
    pub ast_min: f64,

    /// Maximum steel per face 0.04·b·D (mm²)
    pub ast_max: f64,

    /// Tension steel percentage 100·Ast/(b·d)
    pub pt: f64,

    /// False when the section cannot be reinforced within code limits
    pub is_safe: bool,

    /// Why the design failed, when it did
    pub error_message: Option<String>,

    /// Informational notes that do not affect `is_safe`
    pub notes: Vec<String>,
}

impl FlexureResult {
    /// Ratio of applied to limiting moment
    pub fn moment_ratio(&self) -> f64 {
        self.mu / self.mu_lim
    }
}

/// Limiting moment of resistance Mu,lim (kN·m) and xu,max (mm).
pub fn limiting_moment(b: f64, d: f64, fck: f64, fy: f64) -> (f64, f64) {
    let xu_max = xu_max_ratio(fy) * d;
    let mu_lim_nmm = 0.36 * fck * b * xu_max * (d - 0.42 * xu_max);
    (mu_lim_nmm / 1e6, xu_max)
}

/// Tension steel for a singly reinforced section (mm²).
///
/// `mu` in kN·m. The discriminant is floored at zero; callers only use this
/// below Mu,lim where it stays positive.
pub fn singly_reinforced_steel(b: f64, d: f64, mu: f64, fck: f64, fy: f64) -> f64 {
    let mu_nmm = mu * 1e6;
    let discriminant = (1.0 - 4.6 * mu_nmm / (fck * b * d * d)).max(0.0);
    0.5 * fck / fy * (1.0 - discriminant.sqrt()) * b * d
}

/// Design a rectangular section for flexure.
///
/// # Returns
///
/// * `Ok(FlexureResult)` - Required steel; `is_safe = false` for sections that
///   exceed the maximum steel limits
/// * `Err(CalcError)` - Non-physical geometry or invalid material strength
pub fn design(tables: &CodeTables, input: &FlexureInput) -> CalcResult<FlexureResult> {
    input.validate()?;

    let FlexureInput { b, d, overall_depth, fck, fy, .. } = *input;
    let mu = input.mu.abs();
    let d_dash = input.effective_d_dash();

    let (mu_lim, xu_max) = limiting_moment(b, d, fck, fy);
    let ast_min = MIN_STEEL_COEFFICIENT * b * d / fy;
    let ast_max = MAX_STEEL_RATIO * b * overall_depth;
    let fyd = steel_design_stress(fy);

    let mut notes = Vec::new();
    let mut failures = Vec::new();

    let (section_type, mut ast, asc) = if mu <= mu_lim {
        let ast = singly_reinforced_steel(b, d, mu, fck, fy);
        (SectionType::Singly, ast, 0.0)
    } else {
        let fsc = tables.compression_steel_stress(fy, d_dash / d)?;
        let net_stress = fsc - 0.447 * fck;
        if net_stress <= 0.0 {
            failures.push(format!(
                "Compression steel ineffective: fsc {:.0} ≤ 0.447·fck ({})",
                fsc,
                clauses::DOUBLY_REINFORCED
            ));
        }
        let lever_arm = d - d_dash;
        let asc = if net_stress > 0.0 {
            (mu - mu_lim) * 1e6 / (net_stress * lever_arm)
        } else {
            0.0
        };
        let ast_lim = mu_lim * 1e6 / (fyd * (d - 0.42 * xu_max));
        let ast_extra = asc * net_stress.max(0.0) / fyd;
        if d_dash / d > 0.2 {
            notes.push(format!("d'/d = {:.3} exceeds 0.20; fsc taken at 0.20", d_dash / d));
        }
        (SectionType::Doubly, ast_lim + ast_extra, asc)
    };

    if ast < ast_min {
        notes.push(format!(
            "Minimum steel governs: {:.0} mm² ({})",
            ast_min,
            clauses::MIN_TENSION_STEEL
        ));
        ast = ast_min;
    }

    if ast > ast_max {
        failures.push(format!(
            "Over-reinforced: Ast {:.0} mm² > 0.04bD = {:.0} mm² ({})",
            ast,
            ast_max,
            clauses::MAX_TENSION_STEEL
        ));
    }
    if asc > ast_max {
        failures.push(format!(
            "Compression steel {:.0} mm² > 0.04bD = {:.0} mm² ({}) - increase section",
            asc,
            ast_max,
            clauses::MAX_COMPRESSION_STEEL
        ));
    }

    let is_safe = failures.is_empty();
    let clause = match section_type {
        SectionType::Singly => clauses::SINGLY_REINFORCED,
        SectionType::Doubly => clauses::DOUBLY_REINFORCED,
    };
    debug!(
        mu,
        mu_lim,
        ast,
        asc,
        section = section_type.display_name(),
        is_safe,
        clause,
        limit_clause = clauses::LIMITING_MOMENT,
        "flexure designed"
    );

    Ok(FlexureResult {
        section_type,
        mu,
        mu_lim,
        xu_max,
        ast_required: ast,
        asc_required: asc,
        ast_min,
        ast_max,
        pt: 100.0 * ast / (b * d),
        is_safe,
        error_message: if is_safe { None } else { Some(failures.join("; ")) },
        notes,
    })
}
