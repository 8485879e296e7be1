//! SizeBounds - inclusive byte-size filter applied to files

use serde::Serialize;

/// Inclusive size range; `None` leaves that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl SizeBounds {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    /// No bound on either side
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True when `size` lies within `[min, max]`
    pub fn contains(&self, size: u64) -> bool {
        if let Some(min) = self.min {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if size > max {
                return false;
            }
        }
        true
    }

    /// True when both bounds are set and `min > max`
    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}
