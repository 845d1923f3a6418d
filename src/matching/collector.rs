//! Range collection across windows and reference clips

use super::MatchRange;

/// Accumulates confirmed match ranges in discovery order
///
/// Consecutive windows overlap, so an occurrence lying entirely inside the
/// overlap is confirmed twice with identical bounds. Such exact duplicates are
/// dropped; everything else is kept as found.
#[derive(Debug, Clone, Default)]
pub struct RangeCollector {
    ranges: Vec<MatchRange>,
    duplicates_dropped: usize,
}

impl RangeCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a range; returns false if it was an exact duplicate
    pub fn push(&mut self, range: MatchRange) -> bool {
        if self.ranges.contains(&range) {
            self.duplicates_dropped += 1;
            log::debug!(
                "Dropping duplicate range [{}, {}) found in overlapping windows",
                range.start,
                range.end
            );
            return false;
        }
        self.ranges.push(range);
        true
    }

    /// Add several ranges in order; returns how many were new
    pub fn extend(&mut self, ranges: impl IntoIterator<Item = MatchRange>) -> usize {
        ranges.into_iter().filter(|&r| self.push(r)).count()
    }

    /// Ranges in discovery order
    pub fn ranges(&self) -> &[MatchRange] {
        &self.ranges
    }

    /// Ranges sorted by start (stable, so ties keep discovery order)
    pub fn sorted_by_start(&self) -> Vec<MatchRange> {
        let mut sorted = self.ranges.clone();
        sorted.sort_by_key(|r| r.start);
        sorted
    }

    /// Number of collected ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if nothing was collected
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Exact duplicates dropped so far
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Remove and return all ranges, leaving the collector empty
    pub fn take(&mut self) -> Vec<MatchRange> {
        self.duplicates_dropped = 0;
        std::mem::take(&mut self.ranges)
    }

    /// Forget everything collected
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.duplicates_dropped = 0;
    }
}
