//! # siftcopy - recursive directory copy with exclusions
//!
//! Copies a source tree into a destination, skipping directories and files
//! by absolute path, by path relative to the source, or by bare name at any
//! depth, and skipping files outside an inclusive size range. The retained
//! subset is mirrored exactly under the destination root.

// Module declarations
pub mod commands;
pub mod config;
pub mod executor;
pub mod filter;
pub mod logging;
pub mod types;
pub mod ui;
pub mod walker;

// Re-export commonly used types
pub use config::Config;
pub use filter::{ExclusionMatcher, ExclusionSpec};
pub use types::{Decision, EntryKind, ReasonCode, SiftError, SizeBounds};
pub use walker::{ErrorPolicy, FilteredWalker, WalkOptions, WalkReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
