//! Exclusion resolution and matching

mod matcher;
pub mod path;
mod spec;

pub use matcher::ExclusionMatcher;
pub use spec::{ExclusionEntry, ExclusionSpec};
