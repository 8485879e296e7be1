//! Core type definitions for siftcopy

mod bounds;
mod decision;
mod entry;
mod error;

pub use bounds::SizeBounds;
pub use decision::{Decision, Outcome, ReasonCode, Verdict};
pub use entry::{EntryKind, TraversalEntry};
pub use error::SiftError;
