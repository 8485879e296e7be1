//! Lexical path helpers shared by spec resolution and matching

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root; on a relative path leading `..`
/// components are kept. An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir.as_os_str()),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(Component::CurDir.as_os_str());
    }
    out
}

/// True when `raw` contains a path separator for this platform
pub fn has_separator(raw: &Path) -> bool {
    raw.to_string_lossy().chars().any(std::path::is_separator)
}

/// True when `raw` is a single plain name (no separator, not `.` or `..`)
pub fn is_bare_name(raw: &Path) -> bool {
    if has_separator(raw) {
        return false;
    }
    let mut components = raw.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
