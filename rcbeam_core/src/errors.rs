//! # Error Types
//!
//! Structured error types for rcbeam_core.
//!
//! Errors in this crate are **contract violations only**: non-physical geometry,
//! invalid material grades, or combinatorial inputs the detailing code cannot
//! interpret. A section that is valid but fails a code check (over-reinforced,
//! shear stress above τc,max, bars that do not fit) is *not* an error; it comes
//! back as data with `is_safe = false` and populated remarks.
//!
//! ## Example
//!
//! ```rust
//! use rcbeam_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(b_mm: f64) -> CalcResult<()> {
//!     if b_mm <= 0.0 {
//!         return Err(CalcError::dimension("b", b_mm, "Width must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! let err = validate_width(-230.0).unwrap_err();
//! assert!(err.is_contract_violation());
//! assert_eq!(err.error_code(), "DIMENSION_ERROR");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for rcbeam_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Non-physical geometry (zero/negative width or depth, d ≥ D, d' ≥ d)
    #[error("Dimension error for '{field}': {value} - {reason}")]
    Dimension {
        field: String,
        value: String,
        reason: String,
    },

    /// Invalid or zero strength, or grade below the lowest tabulated value
    #[error("Material error for '{field}': {value} - {reason}")]
    Material {
        field: String,
        value: String,
        reason: String,
    },

    /// Invalid combinatorial input to selection or detailing (e.g. one bar into a spacing calc)
    #[error("Configuration error for '{field}': {value} - {reason}")]
    Configuration {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// No registered adapter accepts the given source
    #[error("Unsupported source: '{source_name}'")]
    UnsupportedSource { source_name: String },

    /// Batch run stopped between beams
    #[error("Batch cancelled after {completed} beams")]
    Cancelled { completed: usize },
}

impl CalcError {
    /// Create a Dimension error
    pub fn dimension(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        CalcError::Dimension {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a Material error
    pub fn material(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        CalcError::Material {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a Configuration error
    pub fn configuration(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        CalcError::Configuration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the geometry/material/configuration class of errors.
    ///
    /// Callers use this to separate bad input from I/O trouble; design
    /// failures never reach this type at all.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            CalcError::Dimension { .. } | CalcError::Material { .. } | CalcError::Configuration { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Dimension { .. } => "DIMENSION_ERROR",
            CalcError::Material { .. } => "MATERIAL_ERROR",
            CalcError::Configuration { .. } => "CONFIGURATION_ERROR",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::UnsupportedSource { .. } => "UNSUPPORTED_SOURCE",
            CalcError::Cancelled { .. } => "CANCELLED",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

// Shared input guards used by every engine module.

/// Require a strictly positive, finite geometric value.
pub(crate) fn require_positive_dimension(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::dimension(field, value, "Must be a positive length"));
    }
    Ok(())
}

/// Require a strictly positive, finite material strength.
pub(crate) fn require_positive_strength(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::material(field, value, "Strength must be positive"));
    }
    Ok(())
}
