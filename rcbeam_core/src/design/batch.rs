//! # Batch Design
//!
//! Designs many beams in parallel. Beams are independent, so workers pull the
//! next index from a shared counter and run [`design_beam`] against the shared
//! code tables. A cancel flag is checked between beams, never inside one.
//!
//! A beam whose input violates a contract becomes a [`BatchEntry::Rejected`]
//! and the batch carries on. Entries are sorted by (story, beam_id) once all
//! workers have joined, so the report does not depend on scheduling.
//!
//! ```rust
//! use std::sync::atomic::AtomicBool;
//! use rcbeam_core::design::{design_batch, BatchOptions, BeamInput};
//! use rcbeam_core::settings::DesignSettings;
//! use rcbeam_core::tables::tables;
//!
//! let beams = vec![
//!     BeamInput::new("B2", "L1", 230.0, 450.0, 25.0, 500.0, 60.0, 50.0),
//!     BeamInput::new("B1", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0),
//! ];
//! let cancel = AtomicBool::new(false);
//! let report = design_batch(tables(), &beams, DesignSettings::default(), &BatchOptions::default(), &cancel).unwrap();
//!
//! assert_eq!(report.summary.total, 2);
//! assert_eq!(report.entries[0].beam_id(), "B1");
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{design_beam, BatchReport, BeamDesignResult, BeamInput};
use crate::errors::{CalcError, CalcResult};
use crate::settings::DesignSettings;
use crate::tables::CodeTables;

/// Batch tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Worker threads; 0 means one per available core
    pub workers: usize,
}

impl BatchOptions {
    pub fn with_workers(workers: usize) -> Self {
        BatchOptions { workers }
    }

    /// Workers to spawn for `jobs` beams
    fn resolve(&self, jobs: usize) -> usize {
        let requested = if self.workers == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            self.workers
        };
        requested.clamp(1, jobs.max(1))
    }
}

/// Outcome for one beam in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum BatchEntry {
    /// Designed; may still have failed a code check
    Designed(Box<BeamDesignResult>),
    /// Input violated a contract
    Rejected {
        beam_id: String,
        story: String,
        error: CalcError,
    },
}

impl BatchEntry {
    pub fn beam_id(&self) -> &str {
        match self {
            BatchEntry::Designed(result) => &result.beam_id,
            BatchEntry::Rejected { beam_id, .. } => beam_id,
        }
    }

    pub fn story(&self) -> &str {
        match self {
            BatchEntry::Designed(result) => &result.story,
            BatchEntry::Rejected { story, .. } => story,
        }
    }

    /// Designed and passed every check
    pub fn is_safe(&self) -> bool {
        matches!(self, BatchEntry::Designed(result) if result.is_safe)
    }
}

fn design_entry(tables: &CodeTables, input: &BeamInput, settings: &DesignSettings) -> BatchEntry {
    match design_beam(tables, input, settings) {
        Ok(result) => BatchEntry::Designed(Box::new(result)),
        Err(error) => {
            warn!(beam_id = %input.beam_id, story = %input.story, code = error.error_code(), "beam rejected: {}", error);
            BatchEntry::Rejected {
                beam_id: input.beam_id.clone(),
                story: input.story.clone(),
                error,
            }
        }
    }
}

/// Design every beam in `inputs`.
///
/// # Returns
///
/// * `Ok(BatchReport)` - One entry per input, sorted by (story, beam_id)
/// * `Err(CalcError::Configuration)` - Invalid settings
/// * `Err(CalcError::Cancelled)` - `cancel` was raised before the batch finished
pub fn design_batch(
    tables: &CodeTables,
    inputs: &[BeamInput],
    settings: DesignSettings,
    options: &BatchOptions,
    cancel: &AtomicBool,
) -> CalcResult<BatchReport> {
    settings.validate()?;
    let workers = options.resolve(inputs.len());
    info!(beams = inputs.len(), workers, "batch started");

    let next = AtomicUsize::new(0);
    let completed = AtomicUsize::new(0);
    let results: Mutex<Vec<(usize, BatchEntry)>> = Mutex::new(Vec::with_capacity(inputs.len()));

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                let mut local = Vec::new();
                loop {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(input) = inputs.get(index) else {
                        break;
                    };
                    local.push((index, design_entry(tables, input, &settings)));
                    completed.fetch_add(1, Ordering::Relaxed);
                }
                // A poisoned lock only means another worker panicked; the data is still whole
                results
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .extend(local);
            });
        }
    });

    let completed = completed.into_inner();
    if completed < inputs.len() {
        warn!(completed, total = inputs.len(), "batch cancelled");
        return Err(CalcError::Cancelled { completed });
    }

    let mut indexed = results.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    indexed.sort_by(|(ia, a), (ib, b)| {
        a.story()
            .cmp(b.story())
            .then_with(|| a.beam_id().cmp(b.beam_id()))
            .then(ia.cmp(ib))
    });
    let entries: Vec<BatchEntry> = indexed.into_iter().map(|(_, entry)| entry).collect();

    let report = BatchReport::new(settings, entries);
    info!(
        total = report.summary.total,
        passed = report.summary.passed,
        failed = report.summary.failed,
        rejected = report.summary.rejected,
        "batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::BatchSummary;
    use crate::tables::tables;

    fn beams() -> Vec<BeamInput> {
        vec![
            BeamInput::new("B3", "L2", 230.0, 450.0, 25.0, 500.0, 90.0, 60.0),
            BeamInput::new("B1", "L2", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0),
            BeamInput::new("B2", "L1", 230.0, 450.0, 25.0, 500.0, 75.0, 400.0),
            BeamInput::new("B1", "L1", 300.0, 600.0, 30.0, 415.0, 180.0, 120.0).with_torsion(15.0),
        ]
    }

    fn run(inputs: &[BeamInput], workers: usize) -> BatchReport {
        let cancel = AtomicBool::new(false);
        design_batch(tables(), inputs, DesignSettings::default(), &BatchOptions::with_workers(workers), &cancel).unwrap()
    }

    #[test]
    fn test_entries_sorted_by_story_then_id() {
        let report = run(&beams(), 3);
        let keys: Vec<(&str, &str)> = report.entries.iter().map(|e| (e.story(), e.beam_id())).collect();
        assert_eq!(keys, vec![("L1", "B1"), ("L1", "B2"), ("L2", "B1"), ("L2", "B3")]);
    }

    #[test]
    fn test_result_independent_of_worker_count() {
        let single = run(&beams(), 1);
        let parallel = run(&beams(), 4);
        assert_eq!(single.entries, parallel.entries);
        assert_eq!(single.summary, parallel.summary);
    }

    #[test]
    fn test_failures_and_rejections_counted() {
        let mut inputs = beams();
        inputs.push(BeamInput::new("B9", "L3", 230.0, 450.0, 25.0, 500.0, 75.0, 75.0).with_effective_depth(500.0));
        let report = run(&inputs, 2);

        assert_eq!(report.summary.total, 5);
        assert_eq!(report.summary.rejected, 1);
        assert!(report.summary.failed >= 1);
        assert_eq!(report.summary.passed + report.summary.failed + report.summary.rejected, 5);
        assert!(!report.summary.all_passed());

        let rejected = report.entries.iter().find(|e| e.beam_id() == "B9").unwrap();
        match rejected {
            BatchEntry::Rejected { error, .. } => assert_eq!(error.error_code(), "DIMENSION_ERROR"),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(report.outputs().len(), 4);
    }

    #[test]
    fn test_cancel_before_start() {
        let cancel = AtomicBool::new(true);
        let err = design_batch(tables(), &beams(), DesignSettings::default(), &BatchOptions::default(), &cancel)
            .unwrap_err();
        assert_eq!(err, CalcError::Cancelled { completed: 0 });
    }

    #[test]
    fn test_invalid_settings_rejected_up_front() {
        let cancel = AtomicBool::new(false);
        let settings = DesignSettings { max_layers: 0, ..DesignSettings::default() };
        let err = design_batch(tables(), &beams(), settings, &BatchOptions::default(), &cancel).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_empty_batch() {
        let report = run(&[], 0);
        assert_eq!(report.summary, BatchSummary::default());
        assert!(report.summary.all_passed());
    }
}
