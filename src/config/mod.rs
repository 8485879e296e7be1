//! Configuration management

mod cli;
mod file;
mod size;

pub use cli::{split_lists, Cli};
pub use file::FileConfig;
pub use size::parse_size;

use crate::filter::path::normalize;
use crate::filter::ExclusionSpec;
use crate::types::{SiftError, SizeBounds};
use crate::walker::{ErrorPolicy, WalkOptions};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Global configuration for siftcopy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// Directory exclusions (absolute, relative to source, or bare names)
    pub exclude_dirs: Vec<PathBuf>,

    /// File exclusions (absolute, relative to source, or bare names)
    pub exclude_files: Vec<PathBuf>,

    /// Names excluded at any depth, for both files and directories
    pub exclude_names: Vec<OsString>,

    /// Inclusive lower size bound (None = unbounded)
    pub min_size: Option<u64>,

    /// Inclusive upper size bound (None = unbounded)
    pub max_size: Option<u64>,

    /// Copy `source` as `destination/<source name>`
    pub into_subdir: bool,

    /// Deterministic name-ordered traversal
    pub sorted: bool,

    /// Dry run (report decisions, don't write)
    pub dry_run: bool,

    /// Skip failed entries instead of aborting
    pub keep_going: bool,

    /// Print every decision
    pub verbose: bool,

    /// Print the final report as JSON
    pub json: bool,
}

impl TryFrom<Cli> for Config {
    type Error = SiftError;

    /// Merge an optional config file with command-line values and validate.
    ///
    /// Command-line scalars override the file; exclusion lists are appended
    /// to the file's lists.
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let source = cli
            .src
            .or(file.source)
            .ok_or_else(|| SiftError::Config("A source directory is required (--src)".to_string()))?;
        let destination = cli.dst.or(file.destination).ok_or_else(|| {
            SiftError::Config("A destination directory is required (--dst)".to_string())
        })?;

        let min_size = match cli.min_size {
            Some(size) => Some(size),
            None => file.min_size.as_deref().map(parse_size).transpose()?,
        };
        let max_size = match cli.max_size {
            Some(size) => Some(size),
            None => file.max_size.as_deref().map(parse_size).transpose()?,
        };

        let mut exclude_dirs = file.exclude_dirs;
        exclude_dirs.extend(split_lists(&cli.exclude_dirs));
        let mut exclude_files = file.exclude_files;
        exclude_files.extend(split_lists(&cli.exclude_files));
        let mut exclude_names: Vec<OsString> =
            file.exclude_names.into_iter().map(OsString::from).collect();
        exclude_names.extend(
            split_lists(&cli.exclude_names)
                .into_iter()
                .map(PathBuf::into_os_string),
        );

        let config = Config {
            source,
            destination,
            exclude_dirs,
            exclude_files,
            exclude_names,
            min_size,
            max_size,
            into_subdir: cli.into_subdir || file.into_subdir.unwrap_or(false),
            sorted: cli.sorted || file.sorted.unwrap_or(false),
            dry_run: cli.dry_run,
            keep_going: cli.keep_going || file.keep_going.unwrap_or(false),
            verbose: cli.verbose,
            json: cli.json,
        };

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SiftError> {
        if self.source.as_os_str().is_empty() {
            return Err(SiftError::Config("Source path is empty".to_string()));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(SiftError::Config("Destination path is empty".to_string()));
        }

        // Ensure source exists
        if !self.source.is_dir() {
            return Err(SiftError::Config(format!(
                "Source path does not exist or is not a directory: {}",
                self.source.display()
            )));
        }

        if self.size_bounds().is_inverted() {
            return Err(SiftError::Config(format!(
                "Minimum size {} exceeds maximum size {}",
                self.min_size.unwrap_or_default(),
                self.max_size.unwrap_or_default()
            )));
        }

        let source = self.source_root()?;
        let destination = self.destination_root()?;
        if source == destination {
            return Err(SiftError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }

        Ok(())
    }

    /// Absolute, normalized source root
    pub fn source_root(&self) -> Result<PathBuf, SiftError> {
        absolute(&self.source)
    }

    /// Absolute, normalized destination root, including the source name
    /// when `into_subdir` is set
    pub fn destination_root(&self) -> Result<PathBuf, SiftError> {
        let destination = absolute(&self.destination)?;
        if !self.into_subdir {
            return Ok(destination);
        }
        let source = self.source_root()?;
        let name = source.file_name().ok_or_else(|| {
            SiftError::Config(format!(
                "Source {} has no name to copy into the destination",
                source.display()
            ))
        })?;
        Ok(destination.join(name))
    }

    pub fn size_bounds(&self) -> SizeBounds {
        SizeBounds::new(self.min_size, self.max_size)
    }

    /// Resolve the exclusion lists against the source root
    pub fn exclusion_spec(&self) -> Result<ExclusionSpec, SiftError> {
        ExclusionSpec::resolve(
            &self.source_root()?,
            self.exclude_dirs.as_slice(),
            self.exclude_files.as_slice(),
            self.exclude_names.as_slice(),
        )
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            sorted: self.sorted,
            dry_run: self.dry_run,
            on_error: if self.keep_going {
                ErrorPolicy::Continue
            } else {
                ErrorPolicy::FailFast
            },
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<u64>| match b {
            Some(bytes) => format!("{} bytes", bytes),
            None => "unbounded".to_string(),
        };
        writeln!(f, "Source:         {}", self.source.display())?;
        writeln!(f, "Destination:    {}", self.destination.display())?;
        writeln!(f, "Exclude dirs:   {:?}", self.exclude_dirs)?;
        writeln!(f, "Exclude files:  {:?}", self.exclude_files)?;
        writeln!(f, "Exclude names:  {:?}", self.exclude_names)?;
        writeln!(f, "Min file size:  {}", bound(self.min_size))?;
        writeln!(f, "Max file size:  {}", bound(self.max_size))?;
        writeln!(f, "Into subdir:    {}", self.into_subdir)?;
        writeln!(f, "Dry run:        {}", self.dry_run)?;
        write!(f, "Keep going:     {}", self.keep_going)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, SiftError> {
    let absolute = std::path::absolute(path).map_err(|e| {
        SiftError::Config(format!("Cannot make {} absolute: {}", path.display(), e))
    })?;
    Ok(normalize(&absolute))
}
