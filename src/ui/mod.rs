//! Terminal output

mod progress;

pub use progress::{decision_line, ProgressReporter};
