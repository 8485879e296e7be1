//! Command-line interface

use super::size::parse_size;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Copy a directory tree, skipping excluded paths, names and sizes
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "siftcopy", version, about, long_about = None)]
pub struct Cli {
    /// Source directory
    #[arg(short = 's', long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Destination directory (created if missing)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dst: Option<PathBuf>,

    /// Skip files smaller than this (e.g. 100B, 15K, 2M)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Skip files larger than this (e.g. 1500K, 1G)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Directories to skip: absolute, relative to the source, or a bare name.
    /// Accepts a path list (`a:b` on Unix) and may be repeated.
    #[arg(long = "exclude-dir", value_name = "PATHS")]
    pub exclude_dirs: Vec<OsString>,

    /// Files to skip: absolute, relative to the source, or a bare name
    #[arg(long = "exclude-file", value_name = "PATHS")]
    pub exclude_files: Vec<OsString>,

    /// Names to skip everywhere, for files and directories alike
    #[arg(long = "exclude-name", value_name = "NAMES")]
    pub exclude_names: Vec<OsString>,

    /// Copy the source directory itself into the destination
    #[arg(long)]
    pub into_subdir: bool,

    /// Visit entries in name order
    #[arg(long)]
    pub sorted: bool,

    /// Show what would be copied without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Log and skip unreadable entries instead of stopping
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Print every copy and skip decision
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// TOML file with defaults; command-line values win
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Split each value as a platform path list, dropping empty items
pub fn split_lists(values: &[OsString]) -> Vec<PathBuf> {
    values
        .iter()
        .flat_map(std::env::split_paths)
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}
