//! Range deletion with discard capture
//!
//! Detected ranges may overlap or nest: a long clip and a shorter clip it
//! contains are both confirmed at the same spot. Ranges are first merged into
//! disjoint unions, then deleted in descending order of their start frame.
//! Removing the highest union first leaves the indices of every lower union
//! valid, so all ranges can stay in original recording coordinates.
//!
//! Removed spans are optionally archived. Each span is placed in front of the
//! spans captured before it; because the spans arrive latest-first, the
//! archive ends up in ascending chronological order.

use crate::matching::MatchRange;
use crate::sink::{emit, LogSink};

/// Outcome of a removal pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalStats {
    /// Disjoint spans removed after merging overlapping ranges
    pub ranges_removed: usize,
    /// Total frames removed
    pub frames_removed: usize,
}

/// Clamp ranges to `len` frames and merge overlapping or touching ones
///
/// Returns disjoint, non-empty ranges in ascending order.
pub fn merge_ranges(ranges: &[MatchRange], len: usize) -> Vec<MatchRange> {
    let mut ascending: Vec<MatchRange> = ranges
        .iter()
        .map(|r| MatchRange::new(r.start.min(len), r.end.min(len)))
        .filter(|r| !r.is_empty())
        .collect();
    ascending.sort_by_key(|r| r.start);

    let mut merged: Vec<MatchRange> = Vec::with_capacity(ascending.len());
    for range in ascending {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Sort ranges for deletion: descending start, ties in discovery order
pub fn deletion_order(ranges: &[MatchRange]) -> Vec<MatchRange> {
    let mut ordered = ranges.to_vec();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));
    ordered
}

/// Delete `ranges` from `samples` in place
///
/// # Arguments
///
/// * `samples` - Buffer to edit; indices in `ranges` refer to its current contents
/// * `ranges` - Ranges to delete, in any order; they may overlap
/// * `discard` - If given, receives the removed audio in chronological order,
///   in front of whatever it already holds
/// * `sink` - Optional milestone sink
///
/// Every frame covered by at least one range is removed exactly once.
pub fn remove_ranges(
    samples: &mut Vec<f32>,
    ranges: &[MatchRange],
    discard: Option<&mut Vec<f32>>,
    sink: Option<&dyn LogSink>,
) -> RemovalStats {
    let mut stats = RemovalStats::default();
    let merged = merge_ranges(ranges, samples.len());

    if merged.len() < ranges.len() {
        log::debug!(
            "Merged {} detected ranges into {} disjoint spans",
            ranges.len(),
            merged.len()
        );
        emit(sink, || {
            format!(
                "Merged {} overlapping ranges into {} spans",
                ranges.len(),
                merged.len()
            )
        });
    }

    let mut captured: Vec<Vec<f32>> = Vec::new();
    for range in deletion_order(&merged) {
        let removed: Vec<f32> = samples.drain(range.start..range.end).collect();
        stats.ranges_removed += 1;
        stats.frames_removed += removed.len();
        if discard.is_some() {
            captured.push(removed);
        }

        emit(sink, || format!("Removed from {} to {}", range.start, range.end));
    }

    if let Some(discard) = discard {
        let total: usize = captured.iter().map(Vec::len).sum();
        let mut ordered = Vec::with_capacity(total + discard.len());
        for span in captured.iter().rev() {
            ordered.extend_from_slice(span);
        }
        ordered.extend_from_slice(discard);
        *discard = ordered;
    }

    log::debug!(
        "Removed {} ranges ({} frames)",
        stats.ranges_removed,
        stats.frames_removed
    );

    stats
}
