//! # rcbeam_core - RC Beam Design Engine
//!
//! `rcbeam_core` designs and details reinforced-concrete beams to IS 456:2000.
//! Given a section and its factored moment, shear and torsion it works out the
//! required steel, picks buildable bars and stirrups, and computes the
//! detailing lengths needed to draw the beam.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Failures are data**: A section that fails a code check returns `is_safe = false`
//!   with remarks; only contract violations (bad geometry, grades, combinations) are errors
//! - **Injected tables**: Code tables are built once and passed by reference
//!
//! ## Quick Start
//!
//! ```rust
//! use rcbeam_core::design::{design_beam, BeamInput};
//! use rcbeam_core::settings::DesignSettings;
//! use rcbeam_core::tables::tables;
//!
//! let beam = BeamInput::new("B1", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0)
//!     .with_effective_depth(410.0);
//! let result = design_beam(tables(), &beam, &DesignSettings::default()).unwrap();
//!
//! let row = result.output();
//! println!("{} {} {} {}", row.beam_id, row.tension_bars, row.stirrups, row.remarks);
//! ```
//!
//! ## Modules
//!
//! - [`tables`] - IS 456 design tables and the nearest-lower lookup
//! - [`section`] - Section geometry and factored forces
//! - [`calculations`] - Flexure, shear and torsion design
//! - [`arrangement`] - Bar arrangement selector
//! - [`detailing`] - Development and lap lengths, spacing, side-face steel, stirrup zones
//! - [`design`] - Per-beam orchestrator, batch runs and reports
//! - [`adapters`] - Input source adapters
//! - [`settings`] - Run-wide design settings
//! - [`materials`] - Grades, bar sizes and material constants
//! - [`errors`] - Structured error types
//! - [`file_io`] - Input loading and atomic report saves

pub mod adapters;
pub mod arrangement;
pub mod calculations;
pub mod clauses;
pub mod design;
pub mod detailing;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod section;
pub mod settings;
pub mod tables;

// Re-export commonly used types at crate root for convenience
pub use design::{design_batch, design_beam, BatchReport, BeamDesignOutput, BeamDesignResult, BeamInput};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_beam_inputs, load_report, load_settings, save_report};
pub use settings::DesignSettings;
pub use tables::{tables, CodeTables};
