//! # Member Design Calculations
//!
//! The three strength designs of a beam section. Each follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Design results (JSON-serializable)
//! - `design(&CodeTables, &input) -> CalcResult<*Result>` - Pure function
//!
//! Code-check failures come back inside the result (`is_safe = false`); the
//! `Err` side is reserved for contract violations.
//!
//! ## Available Calculations
//!
//! - [`flexure`] - Singly/doubly reinforced design (IS 456 Annex G)
//! - [`shear`] - Vertical stirrups (IS 456 40)
//! - [`torsion`] - Combined torsion and shear (IS 456 41)

pub mod flexure;
pub mod shear;
pub mod torsion;

pub use flexure::{FlexureInput, FlexureResult, SectionType};
pub use shear::{ShearInput, ShearResult, SpacingRule};
pub use torsion::{TorsionInput, TorsionResult};
