//! Byte-level file copy

use crate::types::SiftError;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::Builder;

const BUFFER_SIZE: usize = 128 * 1024;

/// In-flight copies are named `.siftcopy-XXXXXX.part`
const PART_PREFIX: &str = ".siftcopy-";
const PART_SUFFIX: &str = ".part";

/// Copies the contents of one file to another path
///
/// The walker only needs this one primitive, so tests can swap in a copier
/// that records or fails.
pub trait FileCopier {
    /// Copy `from` to `to`, returning the number of bytes written
    fn copy_file_contents(&self, from: &Path, to: &Path) -> Result<u64, SiftError>;
}

/// Writes to a hidden sibling temp file, syncs, then renames over `to`
///
/// A failed copy never leaves a truncated file at the final path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicCopier;

impl FileCopier for AtomicCopier {
    fn copy_file_contents(&self, from: &Path, to: &Path) -> Result<u64, SiftError> {
        copy_file_atomic(from, to)
    }
}

/// Copy a file atomically using the write-then-rename strategy
///
/// The temp file is created exclusively with a random name, so it can never
/// clobber a sibling that was already copied (e.g. `a.txt.part` next to
/// `a.txt`). It is removed on any failure. The copy takes the source's
/// permission bits.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SiftError::CopyFile)` - any IO failure, with both paths attached
///
/// # Example
/// ```no_run
/// use siftcopy::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), siftcopy::types::SiftError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SiftError> {
    let wrap = |source: io::Error| SiftError::CopyFile {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };

    let mut src_file = File::open(src).map_err(wrap)?;
    let permissions = src_file.metadata().map_err(wrap)?.permissions();

    let mut part = Builder::new()
        .prefix(PART_PREFIX)
        .suffix(PART_SUFFIX)
        .tempfile_in(parent_dir(dest))
        .map_err(wrap)?;

    let total = stream_to(&mut src_file, part.as_file_mut()).map_err(wrap)?;
    part.as_file().set_permissions(permissions).map_err(wrap)?;
    part.persist(dest).map_err(|e| wrap(e.error))?;

    Ok(total)
}

fn stream_to(src_file: &mut File, part_file: &mut File) -> io::Result<u64> {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        part_file.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;
    Ok(total_bytes)
}

/// Directory the temp file goes in; `.` for a bare file name
fn parent_dir(dest: &Path) -> &Path {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("a.txt")), Path::new("."));
        assert_eq!(parent_dir(Path::new("/dst/a.txt")), Path::new("/dst"));
    }

    #[test]
    fn test_copy_does_not_touch_sibling_named_like_a_part_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::write(root.join("src.txt"), b"payload").expect("write source");
        fs::write(root.join("a.txt.part"), b"already copied").expect("write sibling");

        copy_file_atomic(&root.join("src.txt"), &root.join("a.txt")).expect("copy");

        assert_eq!(fs::read(root.join("a.txt")).expect("read dest"), b"payload");
        assert_eq!(
            fs::read(root.join("a.txt.part")).expect("read sibling"),
            b"already copied"
        );
        assert_eq!(entries(root), vec!["a.txt", "a.txt.part", "src.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_keeps_source_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("run.sh");
        fs::write(&src, b"#!/bin/sh\n").expect("write source");
        fs::set_permissions(&src, fs::Permissions::from_mode(0o755)).expect("chmod");

        let dest = temp_dir.path().join("copy.sh");
        copy_file_atomic(&src, &dest).expect("copy");

        let mode = fs::metadata(&dest).expect("stat dest").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
