//! # IS 456:2000 Clause References
//!
//! Traceable references to the clauses each check implements. Remarks and
//! log lines quote these so a reviewer can find the governing rule.

/// Limiting depth of neutral axis and limiting moment
pub const LIMITING_MOMENT: &str = "IS 456 38.1, Annex G-1.1";
/// Singly reinforced rectangular section
pub const SINGLY_REINFORCED: &str = "IS 456 Annex G-1.1(b)";
/// Doubly reinforced rectangular section
pub const DOUBLY_REINFORCED: &str = "IS 456 Annex G-1.2";
/// Minimum tension reinforcement
pub const MIN_TENSION_STEEL: &str = "IS 456 26.5.1.1(a)";
/// Maximum tension reinforcement
pub const MAX_TENSION_STEEL: &str = "IS 456 26.5.1.1(b)";
/// Maximum compression reinforcement
pub const MAX_COMPRESSION_STEEL: &str = "IS 456 26.5.1.2";

/// Maximum shear stress
pub const MAX_SHEAR_STRESS: &str = "IS 456 Table 20";
/// Design of shear reinforcement
pub const SHEAR_REINFORCEMENT: &str = "IS 456 40.4";
/// Minimum shear reinforcement
pub const MIN_SHEAR_REINFORCEMENT: &str = "IS 456 26.5.1.6";
/// Maximum spacing of shear reinforcement
pub const MAX_STIRRUP_SPACING: &str = "IS 456 26.5.1.5";

/// Equivalent moment for torsion
pub const EQUIVALENT_MOMENT: &str = "IS 456 41.4.2";
/// Transverse reinforcement for torsion
pub const TORSION_STIRRUPS: &str = "IS 456 41.4.3";
/// Spacing of torsion stirrups
pub const TORSION_STIRRUP_SPACING: &str = "IS 456 26.5.1.7";

/// Development length
pub const DEVELOPMENT_LENGTH: &str = "IS 456 26.2.1";
/// Minimum horizontal distance between bars
pub const BAR_SPACING: &str = "IS 456 26.3.2";
/// Side face reinforcement
pub const SIDE_FACE: &str = "IS 456 26.5.1.3";
/// Transverse reinforcement in ductile beams
pub const SEISMIC_HOOPS: &str = "IS 13920 6.3.5";
