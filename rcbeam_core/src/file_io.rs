//! # File I/O Module
//!
//! Reads run inputs and writes batch reports:
//! - **Beam inputs**: through the [`AdapterRegistry`], so any registered format works
//! - **Settings**: a JSON [`DesignSettings`] file
//! - **Atomic saves**: reports are written to `.tmp`, synced, then renamed into place
//! - **Version validation**: reports carry a schema version checked on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::atomic::AtomicBool;
//! use rcbeam_core::design::{design_batch, BatchOptions};
//! use rcbeam_core::file_io::{load_beam_inputs, load_settings, save_report};
//! use rcbeam_core::tables::tables;
//!
//! let beams = load_beam_inputs(Path::new("beams.json"))?;
//! let settings = load_settings(Path::new("settings.json"))?;
//! let cancel = AtomicBool::new(false);
//! let report = design_batch(tables(), &beams, settings, &BatchOptions::default(), &cancel)?;
//! save_report(&report, Path::new("report.json"))?;
//! # Ok::<(), rcbeam_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::adapters::AdapterRegistry;
use crate::design::{BatchReport, BeamInput, REPORT_SCHEMA_VERSION};
use crate::errors::{CalcError, CalcResult};
use crate::settings::DesignSettings;

/// Load beam inputs with the built-in adapters.
pub fn load_beam_inputs(path: &Path) -> CalcResult<Vec<BeamInput>> {
    load_beam_inputs_with(&AdapterRegistry::with_builtin(), path)
}

/// Load beam inputs with a caller-supplied registry.
pub fn load_beam_inputs_with(registry: &AdapterRegistry, path: &Path) -> CalcResult<Vec<BeamInput>> {
    registry.load(path)
}

/// Load and validate design settings.
pub fn load_settings(path: &Path) -> CalcResult<DesignSettings> {
    let contents = read_to_string(path)?;
    let settings: DesignSettings = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid settings in {}: {}", path.display(), e),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Save a report to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize report to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp over the target
pub fn save_report(report: &BatchReport, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    write_atomic(path, json.as_bytes())
}

/// Load a report, rejecting incompatible schema versions.
pub fn load_report(path: &Path) -> CalcResult<BatchReport> {
    let contents = read_to_string(path)?;
    let report: BatchReport = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;
    validate_version(&report.version)?;
    Ok(report)
}

fn read_to_string(path: &Path) -> CalcResult<String> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(bytes).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: REPORT_SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(REPORT_SCHEMA_VERSION);

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    // In 0.x a newer minor may carry breaking changes
    if current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}
