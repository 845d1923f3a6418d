//! Clip matching modules
//!
//! Locate reference clips inside a recording:
//! - Overlapping correlation windows
//! - FFT cross-correlation
//! - Peak verification with amplitude-normalized scoring
//! - Range collection across windows and clips

pub mod collector;
pub mod correlation;
pub mod verifier;
pub mod window;

use serde::{Deserialize, Serialize};

/// Half-open frame interval `[start, end)` of a confirmed match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRange {
    /// First frame to remove
    pub start: usize,
    /// Exclusive end frame
    pub end: usize,
}

impl MatchRange {
    /// Create a range
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of frames covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the range covers no frames
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True if the two ranges share at least one frame
    pub fn overlaps(&self, other: &MatchRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}
