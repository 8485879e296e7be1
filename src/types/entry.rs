//! TraversalEntry - one child produced by a directory listing

use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// Kind of a traversal entry, selecting which exclusion list applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Dir,
    File,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        self == EntryKind::Dir
    }
}

/// A child of the directory being walked
///
/// Built fresh for every listing and dropped once the entry is handled.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalEntry {
    /// Base name as returned by the listing
    pub name: OsString,

    /// Directory or file
    pub kind: EntryKind,

    /// Absolute source path
    pub abs_path: PathBuf,
}

impl TraversalEntry {
    pub fn new(name: OsString, kind: EntryKind, abs_path: PathBuf) -> Self {
        Self {
            name,
            kind,
            abs_path,
        }
    }
}
