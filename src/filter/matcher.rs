//! Exclusion matcher - classifies a candidate path against an ExclusionSpec

use super::path::normalize;
use super::spec::{ExclusionEntry, ExclusionSpec};
use crate::types::{EntryKind, ReasonCode, Verdict};
use std::ffi::OsStr;
use std::path::Path;

/// Decides whether a path is excluded, and why
///
/// Directories are checked against the directory list, files against the
/// file list. Bare names are checked for both kinds.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    spec: ExclusionSpec,
}

impl ExclusionMatcher {
    pub fn new(spec: ExclusionSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ExclusionSpec {
        &self.spec
    }

    /// Classify `candidate` (an absolute path).
    ///
    /// Rules are tried in order: absolute entries, relative entries, bare
    /// names. The first hit decides the reason. An absolute entry only
    /// matches while it exists on disk; a failed existence check counts as
    /// "does not exist".
    pub fn matches(&self, candidate: &Path, kind: EntryKind) -> Verdict {
        let candidate = normalize(candidate);
        let entries = match kind {
            EntryKind::Dir => self.spec.dir_entries(),
            EntryKind::File => self.spec.file_entries(),
        };

        if let Some(reason) = match_paths(entries, &candidate) {
            return Verdict::exclude(reason);
        }

        if let Some(name) = candidate.file_name() {
            if self.matches_name(entries, name) {
                return Verdict::exclude(ReasonCode::NameMatch);
            }
        }

        Verdict::KEEP
    }

    fn matches_name(&self, entries: &[ExclusionEntry], name: &OsStr) -> bool {
        let in_kind_list = entries
            .iter()
            .any(|entry| matches!(entry, ExclusionEntry::Name(n) if n == name));
        in_kind_list || self.spec.names().iter().any(|n| n == name)
    }
}

fn match_paths(entries: &[ExclusionEntry], candidate: &Path) -> Option<ReasonCode> {
    let absolute_hit = entries.iter().any(|entry| match entry {
        ExclusionEntry::Absolute(path) => {
            path == candidate && path.try_exists().unwrap_or(false)
        }
        _ => false,
    });
    if absolute_hit {
        return Some(ReasonCode::AbsoluteMatch);
    }

    let relative_hit = entries.iter().any(|entry| {
        matches!(entry, ExclusionEntry::Relative { resolved, .. } if resolved == candidate)
    });
    if relative_hit {
        return Some(ReasonCode::RelativeMatch);
    }

    None
}
