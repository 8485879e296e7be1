//! TOML configuration file

use crate::types::SiftError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from a `--config` file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    pub exclude_dirs: Vec<PathBuf>,
    pub exclude_files: Vec<PathBuf>,
    pub exclude_names: Vec<String>,
    pub into_subdir: Option<bool>,
    pub sorted: Option<bool>,
    pub keep_going: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, SiftError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SiftError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&contents).map_err(|e| match e {
            SiftError::Config(msg) => {
                SiftError::Config(format!("{} (in {})", msg, path.display()))
            }
            other => other,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, SiftError> {
        toml::from_str(contents)
            .map_err(|e| SiftError::Config(format!("Invalid config file: {}", e)))
    }
}
