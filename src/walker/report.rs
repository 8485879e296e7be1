//! Statistics gathered during one walk

use crate::types::{EntryKind, ReasonCode, SiftError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// An entry that failed under `ErrorPolicy::Continue`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkFailure {
    pub path: Option<PathBuf>,
    pub error: String,
}

/// Result of a completed walk
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalkReport {
    /// Files handed to the copier (or that would be, in a dry run)
    pub files_copied: u64,

    /// Bytes written by the copier
    pub bytes_copied: u64,

    /// Directories mirrored at the destination
    pub dirs_mirrored: u64,

    pub excluded_dirs: u64,
    pub excluded_files: u64,

    /// Exclusion counts keyed by reason
    pub excluded_by_reason: BTreeMap<ReasonCode, u64>,

    /// Entries skipped because of errors (continue policy only)
    pub failures: Vec<WalkFailure>,

    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl WalkReport {
    pub fn record_excluded(&mut self, kind: EntryKind, reason: ReasonCode) {
        match kind {
            EntryKind::Dir => self.excluded_dirs += 1,
            EntryKind::File => self.excluded_files += 1,
        }
        *self.excluded_by_reason.entry(reason).or_insert(0) += 1;
    }

    pub fn record_copied(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied = self.bytes_copied.saturating_add(bytes);
    }

    pub fn record_dir(&mut self) {
        self.dirs_mirrored += 1;
    }

    pub fn record_failure(&mut self, error: &SiftError) {
        self.failures.push(WalkFailure {
            path: error.path().cloned(),
            error: error.to_string(),
        });
    }

    /// Count of exclusions for one reason
    pub fn excluded_for(&self, reason: ReasonCode) -> u64 {
        self.excluded_by_reason.get(&reason).copied().unwrap_or(0)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Short human summary of the first few failures
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .take(3)
            .map(|failure| failure.error.clone())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
