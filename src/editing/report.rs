//! Serializable reports of detected and removed ranges

use crate::matching::MatchRange;
use serde::{Deserialize, Serialize};

/// A detected range expressed in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeReport {
    /// Start of the range in seconds
    pub start_seconds: f64,
    /// End of the range in seconds
    pub end_seconds: f64,
}

impl RangeReport {
    /// Convert a frame range at `sample_rate`
    pub fn from_range(range: &MatchRange, sample_rate: u32) -> Self {
        let sr = sample_rate.max(1) as f64;
        Self {
            start_seconds: range.start as f64 / sr,
            end_seconds: range.end as f64 / sr,
        }
    }
}

/// Counters gathered while detecting ranges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Correlation windows processed
    pub windows: usize,
    /// (window, clip) correlations computed
    pub correlations: usize,
    /// Verification rounds attempted
    pub rounds: usize,
    /// Ranges confirmed (duplicates included)
    pub matches: usize,
    /// Exact duplicate ranges dropped
    pub duplicates_dropped: usize,
}

/// Summary of one detection and removal run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalSummary {
    /// Sample rate of the recording in Hz
    pub sample_rate: u32,
    /// Recording duration before removal
    pub original_duration_seconds: f64,
    /// Recording duration after removal
    pub trimmed_duration_seconds: f64,
    /// Duration of the discard buffer
    pub discard_duration_seconds: f64,
    /// Detected ranges, ascending by start
    pub ranges: Vec<RangeReport>,
    /// Detection counters
    pub detection: DetectionStats,
    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_report_seconds() {
        let report = RangeReport::from_range(&MatchRange::new(3000, 3300), 1000);
        assert_eq!(report.start_seconds, 3.0);
        assert!((report.end_seconds - 3.3).abs() < 1e-12);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RemovalSummary {
            sample_rate: 1000,
            original_duration_seconds: 10.0,
            trimmed_duration_seconds: 9.7,
            discard_duration_seconds: 0.3,
            ranges: vec![RangeReport::from_range(&MatchRange::new(3000, 3300), 1000)],
            detection: DetectionStats::default(),
            processing_time_ms: 1.5,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"start_seconds\":3.0"), "{}", json);
        let back: RemovalSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ranges, summary.ranges);
    }
}
