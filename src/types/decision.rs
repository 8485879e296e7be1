//! Per-entry verdicts and the decisions reported to subscribers

use super::EntryKind;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Why an entry was excluded (or `None` when it was kept)
///
/// Reasons are diagnostic only; they never change what gets copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Matched an absolute exclusion path that exists on disk
    AbsoluteMatch,

    /// Matched a relative exclusion path resolved against the source root
    RelativeMatch,

    /// Matched a bare name at some depth
    NameMatch,

    /// File size outside the configured bounds
    SizeOutOfRange,

    /// The destination root itself, when it sits inside the source
    DestinationRoot,

    /// Not excluded
    #[default]
    None,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::AbsoluteMatch => "excluded by absolute path",
            ReasonCode::RelativeMatch => "excluded by relative path",
            ReasonCode::NameMatch => "excluded by name",
            ReasonCode::SizeOutOfRange => "excluded by size",
            ReasonCode::DestinationRoot => "destination directory",
            ReasonCode::None => "not excluded",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matcher result for one candidate path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub excluded: bool,
    pub reason: ReasonCode,
}

impl Verdict {
    pub const KEEP: Verdict = Verdict {
        excluded: false,
        reason: ReasonCode::None,
    };

    pub fn exclude(reason: ReasonCode) -> Self {
        Self {
            excluded: true,
            reason,
        }
    }
}

/// What the walker did with an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Copied,
    Excluded,
}

/// Event emitted once per examined entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    /// Absolute source path
    pub path: PathBuf,

    /// Mirrored destination path (copied entries only)
    pub destination: Option<PathBuf>,

    pub kind: EntryKind,
    pub outcome: Outcome,
    pub reason: ReasonCode,

    /// Bytes written for copied files, zero otherwise
    pub bytes: u64,
}

impl Decision {
    pub fn excluded(path: PathBuf, kind: EntryKind, reason: ReasonCode) -> Self {
        Self {
            path,
            destination: None,
            kind,
            outcome: Outcome::Excluded,
            reason,
            bytes: 0,
        }
    }

    pub fn copied(path: PathBuf, destination: PathBuf, kind: EntryKind, bytes: u64) -> Self {
        Self {
            path,
            destination: Some(destination),
            kind,
            outcome: Outcome::Copied,
            reason: ReasonCode::None,
            bytes,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    pub fn is_copied(&self) -> bool {
        self.outcome == Outcome::Copied
    }
}
