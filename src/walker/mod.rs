//! Filtered depth-first walker that mirrors retained entries at the destination

mod report;

pub use report::{WalkFailure, WalkReport};

use crate::executor::FileCopier;
use crate::filter::path::normalize;
use crate::filter::ExclusionMatcher;
use crate::types::{Decision, EntryKind, ReasonCode, SiftError, SizeBounds, TraversalEntry};
use std::ffi::OsString;
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Callback receiving one `Decision` per examined entry
pub type DecisionCallback = dyn Fn(&Decision) + Send + Sync;

/// What to do when reading or writing an entry fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole walk on the first error
    #[default]
    FailFast,

    /// Record the error and keep going
    ///
    /// Listing and metadata failures skip the entry; a failed destination
    /// directory skips that subtree; a failed copy skips that file.
    Continue,
}

/// Knobs for a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Visit children in name order instead of listing order
    pub sorted: bool,

    /// Decide everything, write nothing
    pub dry_run: bool,

    pub on_error: ErrorPolicy,
}

/// Top-level root pair, fixed for the whole walk
struct Roots<'p> {
    src: &'p Path,
    dst: &'p Path,
}

impl Roots<'_> {
    /// `dst_root` + (`abs` relative to `src_root`)
    fn destination_for(&self, abs: &Path) -> Result<PathBuf, SiftError> {
        let relative = abs.strip_prefix(self.src).map_err(|_| {
            SiftError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{} is not under source root {}",
                    abs.display(),
                    self.src.display()
                ),
            ))
        })?;
        Ok(self.dst.join(relative))
    }
}

/// Depth-first copier applying exclusions and size bounds
///
/// # Example
/// ```no_run
/// use siftcopy::executor::AtomicCopier;
/// use siftcopy::filter::{ExclusionMatcher, ExclusionSpec};
/// use siftcopy::types::SizeBounds;
/// use siftcopy::walker::FilteredWalker;
/// use std::path::Path;
///
/// let src = Path::new("/data/src");
/// let spec = ExclusionSpec::resolve(src, &["build"], &[] as &[&str], &["node_modules"])?;
/// let matcher = ExclusionMatcher::new(spec);
/// let walker = FilteredWalker::new(&matcher, SizeBounds::unbounded(), &AtomicCopier);
/// let report = walker.walk(src, Path::new("/backup/src"))?;
/// println!("{} files copied", report.files_copied);
/// # Ok::<(), siftcopy::types::SiftError>(())
/// ```
pub struct FilteredWalker<'a> {
    matcher: &'a ExclusionMatcher,
    bounds: SizeBounds,
    copier: &'a dyn FileCopier,
    options: WalkOptions,
    on_decision: Option<&'a DecisionCallback>,
}

impl<'a> FilteredWalker<'a> {
    pub fn new(matcher: &'a ExclusionMatcher, bounds: SizeBounds, copier: &'a dyn FileCopier) -> Self {
        Self {
            matcher,
            bounds,
            copier,
            options: WalkOptions::default(),
            on_decision: None,
        }
    }

    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn on_decision(mut self, callback: &'a DecisionCallback) -> Self {
        self.on_decision = Some(callback);
        self
    }

    /// Copy the retained part of `src_root` into `dst_root`
    ///
    /// A `dst_root` inside `src_root` is allowed; that subtree is never
    /// copied into itself.
    ///
    /// # Errors
    /// * `SiftError::Config` - roots not absolute, or equal
    /// * `SiftError::CreateDir` - `dst_root` cannot be created (always fatal)
    /// * `SiftError::ReadDir` / `Metadata` / `CreateDir` / `CopyFile` - under
    ///   `ErrorPolicy::FailFast` only; otherwise recorded in the report
    pub fn walk(&self, src_root: &Path, dst_root: &Path) -> Result<WalkReport, SiftError> {
        let start = Instant::now();
        let src_root = normalize(src_root);
        let dst_root = normalize(dst_root);
        check_roots(&src_root, &dst_root)?;

        let roots = Roots {
            src: &src_root,
            dst: &dst_root,
        };
        let mut report = WalkReport::default();

        if dst_root.starts_with(&src_root) {
            tracing::warn!(
                destination = %dst_root.display(),
                "destination is inside the source and will not be copied"
            );
        }

        // Nothing is written until the source root has been listed
        let children = match self.list_dir(&src_root) {
            Ok(children) => children,
            Err(err) => {
                self.recover(&mut report, err)?;
                Vec::new()
            }
        };
        self.create_dir(&dst_root)?;
        self.visit_children(&roots, children, &mut report)?;

        report.elapsed = start.elapsed();
        tracing::debug!(
            files = report.files_copied,
            bytes = report.bytes_copied,
            failures = report.failures.len(),
            "walk finished"
        );
        Ok(report)
    }

    fn walk_dir(&self, roots: &Roots<'_>, dir: &Path, report: &mut WalkReport) -> Result<(), SiftError> {
        match self.list_dir(dir) {
            Ok(children) => self.visit_children(roots, children, report),
            Err(err) => self.recover(report, err),
        }
    }

    fn visit_children(
        &self,
        roots: &Roots<'_>,
        children: Vec<Result<TraversalEntry, SiftError>>,
        report: &mut WalkReport,
    ) -> Result<(), SiftError> {
        for child in children {
            let entry = match child {
                Ok(entry) => entry,
                Err(err) => {
                    self.recover(report, err)?;
                    continue;
                }
            };

            match entry.kind {
                EntryKind::Dir => self.visit_dir(roots, entry, report)?,
                EntryKind::File => self.visit_file(roots, entry, report)?,
            }
        }

        Ok(())
    }

    fn visit_dir(
        &self,
        roots: &Roots<'_>,
        entry: TraversalEntry,
        report: &mut WalkReport,
    ) -> Result<(), SiftError> {
        let verdict = self.matcher.matches(&entry.abs_path, EntryKind::Dir);
        if verdict.excluded {
            self.exclude(entry, verdict.reason, report);
            return Ok(());
        }
        if entry.abs_path == roots.dst {
            self.exclude(entry, ReasonCode::DestinationRoot, report);
            return Ok(());
        }

        let dest = roots.destination_for(&entry.abs_path)?;
        if let Err(err) = self.create_dir(&dest) {
            return self.recover(report, err);
        }
        report.record_dir();
        self.emit(&Decision::copied(
            entry.abs_path.clone(),
            dest,
            EntryKind::Dir,
            0,
        ));

        self.walk_dir(roots, &entry.abs_path, report)
    }

    fn visit_file(
        &self,
        roots: &Roots<'_>,
        entry: TraversalEntry,
        report: &mut WalkReport,
    ) -> Result<(), SiftError> {
        let verdict = self.matcher.matches(&entry.abs_path, EntryKind::File);
        if verdict.excluded {
            self.exclude(entry, verdict.reason, report);
            return Ok(());
        }

        let size = match fs::metadata(&entry.abs_path) {
            Ok(metadata) => metadata.len(),
            Err(source) => {
                return self.recover(
                    report,
                    SiftError::Metadata {
                        path: entry.abs_path,
                        source,
                    },
                )
            }
        };
        if !self.bounds.contains(size) {
            self.exclude(entry, ReasonCode::SizeOutOfRange, report);
            return Ok(());
        }

        let dest = roots.destination_for(&entry.abs_path)?;
        let bytes = if self.options.dry_run {
            size
        } else {
            match self.copier.copy_file_contents(&entry.abs_path, &dest) {
                Ok(bytes) => bytes,
                Err(err) => return self.recover(report, err),
            }
        };

        tracing::debug!(
            from = %entry.abs_path.display(),
            to = %dest.display(),
            bytes,
            "copied"
        );
        report.record_copied(bytes);
        self.emit(&Decision::copied(entry.abs_path, dest, EntryKind::File, bytes));
        Ok(())
    }

    fn exclude(&self, entry: TraversalEntry, reason: ReasonCode, report: &mut WalkReport) {
        tracing::debug!(path = %entry.abs_path.display(), %reason, "skipped");
        report.record_excluded(entry.kind, reason);
        self.emit(&Decision::excluded(entry.abs_path, entry.kind, reason));
    }

    /// List `dir` into entries; the directory handle is closed on return.
    fn list_dir(&self, dir: &Path) -> Result<Vec<Result<TraversalEntry, SiftError>>, SiftError> {
        let read_dir = fs::read_dir(dir).map_err(|source| SiftError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut children: Vec<Result<TraversalEntry, SiftError>> = read_dir
            .filter_map(|item| to_entry(dir, item).transpose())
            .collect();

        if self.options.sorted {
            children.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        }

        Ok(children)
    }

    fn create_dir(&self, path: &Path) -> Result<(), SiftError> {
        if self.options.dry_run {
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|source| match source.kind() {
            io::ErrorKind::PermissionDenied => SiftError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => SiftError::CreateDir {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn recover(&self, report: &mut WalkReport, err: SiftError) -> Result<(), SiftError> {
        match self.options.on_error {
            ErrorPolicy::FailFast => Err(err),
            ErrorPolicy::Continue => {
                tracing::warn!(error = %err, "skipping after error");
                report.record_failure(&err);
                Ok(())
            }
        }
    }

    fn emit(&self, decision: &Decision) {
        if let Some(callback) = self.on_decision {
            callback(decision);
        }
    }
}

fn check_roots(src_root: &Path, dst_root: &Path) -> Result<(), SiftError> {
    if !src_root.is_absolute() || !dst_root.is_absolute() {
        return Err(SiftError::Config(format!(
            "Walk roots must be absolute: {} -> {}",
            src_root.display(),
            dst_root.display()
        )));
    }
    if src_root == dst_root {
        return Err(SiftError::Config(
            "Source and destination cannot be the same".to_string(),
        ));
    }
    Ok(())
}

/// Turn one listing item into an entry.
///
/// `Ok(None)` for things that are neither files nor directories: special
/// files, broken symlinks, and symlinks to directories (not descended).
fn to_entry(dir: &Path, item: io::Result<DirEntry>) -> Result<Option<TraversalEntry>, SiftError> {
    let dir_entry = item.map_err(|source| SiftError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let name = dir_entry.file_name();
    let abs_path = dir.join(&name);
    let file_type = dir_entry.file_type().map_err(|source| SiftError::Metadata {
        path: abs_path.clone(),
        source,
    })?;

    let kind = if file_type.is_dir() {
        EntryKind::Dir
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        match fs::metadata(&abs_path) {
            Ok(target) if target.is_file() => EntryKind::File,
            Ok(_) => {
                tracing::debug!(path = %abs_path.display(), "not following symlink to non-file");
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!(path = %abs_path.display(), error = %e, "skipping broken symlink");
                return Ok(None);
            }
        }
    } else {
        tracing::debug!(path = %abs_path.display(), "skipping special file");
        return Ok(None);
    };

    Ok(Some(TraversalEntry::new(name, kind, abs_path)))
}

fn sort_key(child: &Result<TraversalEntry, SiftError>) -> Option<&OsString> {
    child.as_ref().ok().map(|entry| &entry.name)
}
