//! Error types for siftcopy

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for siftcopy operations
#[derive(Debug, Error)]
pub enum SiftError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration, raised before any copying starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// A source directory could not be listed
    #[error("Failed to read directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    /// Metadata for a source entry could not be read
    #[error("Failed to read metadata for {path}: {source}")]
    Metadata { path: PathBuf, source: io::Error },

    /// A destination directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    /// File contents could not be copied
    #[error("Failed to copy {from} -> {to}: {source}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// The walk finished but some entries could not be copied
    #[error("Copy completed with {failed} error(s). Example failures: {summary}")]
    Partial { failed: usize, summary: String },
}

impl SiftError {
    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, SiftError::Config(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        match self {
            SiftError::PermissionDenied { .. } => true,
            SiftError::Io(e)
            | SiftError::ReadDir { source: e, .. }
            | SiftError::Metadata { source: e, .. }
            | SiftError::CreateDir { source: e, .. }
            | SiftError::CopyFile { source: e, .. } => {
                e.kind() == io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }

    /// Path the error is about, if it has one
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            SiftError::ReadDir { path, .. }
            | SiftError::Metadata { path, .. }
            | SiftError::CreateDir { path, .. }
            | SiftError::PermissionDenied { path } => Some(path),
            SiftError::CopyFile { from, .. } => Some(from),
            _ => None,
        }
    }
}
