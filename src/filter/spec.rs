//! Exclusion specification, resolved once before traversal

use super::path::{has_separator, is_bare_name, normalize};
use crate::types::SiftError;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// One configured exclusion, classified at resolution time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionEntry {
    /// Absolute path as given (normalized)
    Absolute(PathBuf),

    /// Relative path with a separator, made absolute against the source root
    Relative { raw: PathBuf, resolved: PathBuf },

    /// Bare name, matched against base names at any depth
    Name(OsString),
}

impl ExclusionEntry {
    /// Classify `raw` and resolve it against `source_root`.
    ///
    /// Returns `None` for empty entries (e.g. from `a::b` in a path list).
    pub fn resolve(raw: &OsStr, source_root: &Path) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let raw_path = Path::new(raw);

        if raw_path.is_absolute() {
            return Some(ExclusionEntry::Absolute(normalize(raw_path)));
        }

        if is_bare_name(raw_path) {
            return Some(ExclusionEntry::Name(raw.to_os_string()));
        }

        Some(ExclusionEntry::Relative {
            raw: raw_path.to_path_buf(),
            resolved: resolve_relative(raw_path, source_root),
        })
    }

    /// The path this entry compares against, if it is a path entry
    pub fn path(&self) -> Option<&Path> {
        match self {
            ExclusionEntry::Absolute(path) => Some(path),
            ExclusionEntry::Relative { resolved, .. } => Some(resolved),
            ExclusionEntry::Name(_) => None,
        }
    }

    /// True for an absolute entry that does not exist on disk right now
    pub fn is_stale(&self) -> bool {
        match self {
            ExclusionEntry::Absolute(path) => !path.try_exists().unwrap_or(false),
            _ => false,
        }
    }
}

/// Join a relative entry onto the source root.
///
/// An entry that starts with the source root's own directory name
/// (`data/sub` for source `/x/data`) is taken relative to the root's
/// parent, unless the root itself actually contains that path.
fn resolve_relative(raw: &Path, source_root: &Path) -> PathBuf {
    let under_root = normalize(&source_root.join(raw));

    let first = raw.components().next();
    let names_root = matches!(
        (first, source_root.file_name()),
        (Some(Component::Normal(first)), Some(root_name)) if first == root_name
    );

    if names_root && !under_root.try_exists().unwrap_or(false) {
        if let Some(parent) = source_root.parent() {
            return normalize(&parent.join(raw));
        }
    }

    under_root
}

fn resolve_entries<S: AsRef<OsStr>>(raws: &[S], source_root: &Path) -> Vec<ExclusionEntry> {
    raws.iter()
        .filter_map(|raw| ExclusionEntry::resolve(raw.as_ref(), source_root))
        .collect()
}

/// Immutable set of exclusions consulted by the matcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSpec {
    dir_entries: Vec<ExclusionEntry>,
    file_entries: Vec<ExclusionEntry>,
    names: Vec<OsString>,
}

impl ExclusionSpec {
    /// Spec that excludes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve raw exclusion strings against `source_root`.
    ///
    /// # Errors
    /// * `SiftError::Config` if `source_root` is not absolute
    /// * `SiftError::Config` if an excluded name contains a separator
    pub fn resolve<D, F, N>(
        source_root: &Path,
        dir_paths: &[D],
        file_paths: &[F],
        names: &[N],
    ) -> Result<Self, SiftError>
    where
        D: AsRef<OsStr>,
        F: AsRef<OsStr>,
        N: AsRef<OsStr>,
    {
        if !source_root.is_absolute() {
            return Err(SiftError::Config(format!(
                "Source root must be absolute to resolve exclusions: {}",
                source_root.display()
            )));
        }
        let source_root = normalize(source_root);

        let dir_entries = resolve_entries(dir_paths, &source_root);
        let file_entries = resolve_entries(file_paths, &source_root);

        let mut bare_names = Vec::with_capacity(names.len());
        for name in names {
            let name: &OsStr = name.as_ref();
            if name.is_empty() {
                continue;
            }
            if has_separator(Path::new(name)) || !is_bare_name(Path::new(name)) {
                return Err(SiftError::Config(format!(
                    "Excluded name '{}' must be a bare name without path separators",
                    name.to_string_lossy()
                )));
            }
            bare_names.push(name.to_os_string());
        }

        let spec = Self {
            dir_entries,
            file_entries,
            names: bare_names,
        };

        for stale in spec.stale_entries() {
            if let Some(path) = stale.path() {
                tracing::warn!(
                    path = %path.display(),
                    "absolute exclusion does not exist and will be ignored"
                );
            }
        }

        Ok(spec)
    }

    pub fn dir_entries(&self) -> &[ExclusionEntry] {
        &self.dir_entries
    }

    pub fn file_entries(&self) -> &[ExclusionEntry] {
        &self.file_entries
    }

    pub fn names(&self) -> &[OsString] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.dir_entries.is_empty() && self.file_entries.is_empty() && self.names.is_empty()
    }

    /// Absolute entries that currently point at nothing
    pub fn stale_entries(&self) -> Vec<&ExclusionEntry> {
        self.dir_entries
            .iter()
            .chain(self.file_entries.iter())
            .filter(|entry| entry.is_stale())
            .collect()
    }
}
