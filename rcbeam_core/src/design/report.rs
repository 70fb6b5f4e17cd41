//! Batch report written at the end of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BatchEntry, BeamDesignOutput};
use crate::settings::DesignSettings;

/// Current schema version for report files
pub const REPORT_SCHEMA_VERSION: &str = "0.1.0";

/// Counts over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Beams whose input violated a contract
    pub rejected: usize,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        entries.iter().fold(BatchSummary::default(), |mut acc, entry| {
            acc.total += 1;
            match entry {
                BatchEntry::Designed(result) if result.is_safe => acc.passed += 1,
                BatchEntry::Designed(_) => acc.failed += 1,
                BatchEntry::Rejected { .. } => acc.rejected += 1,
            }
            acc
        })
    }

    /// True when every beam was designed and passed
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Results of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Schema version (semver)
    pub version: String,
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Design code label
    pub code: String,
    pub settings: DesignSettings,
    /// Entries sorted by (story, beam_id)
    pub entries: Vec<BatchEntry>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn new(settings: DesignSettings, entries: Vec<BatchEntry>) -> Self {
        BatchReport {
            version: REPORT_SCHEMA_VERSION.to_string(),
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            code: settings.code.clone(),
            summary: BatchSummary::from_entries(&entries),
            settings,
            entries,
        }
    }

    /// Output records of the designed beams, in report order
    pub fn outputs(&self) -> Vec<BeamDesignOutput> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                BatchEntry::Designed(result) => Some(result.output()),
                BatchEntry::Rejected { .. } => None,
            })
            .collect()
    }
}
