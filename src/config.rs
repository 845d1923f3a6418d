//! Configuration parameters for clip detection and removal

use crate::preprocessing::silence::{MIN_SUSTAINED_SAMPLES, SILENCE_THRESHOLD};

/// Default maximum absolute scoring difference for a match
pub const MATCH_THRESHOLD_DEFAULT: f32 = 1.0;

/// Default correlation window length in minutes
pub const CORRELATION_CHUNK_MINUTES_DEFAULT: f32 = 30.0;

/// Removal configuration parameters
#[derive(Debug, Clone)]
pub struct RemovalConfig {
    // Correlation
    /// Length of one correlation window in minutes (default: 30.0)
    ///
    /// Full cross-correlation cost grows with the combined input length, so the
    /// recording is processed in overlapping windows of this duration.
    pub chunk_minutes: f32,

    // Reference clips
    /// Match threshold given to reference clips built by the crate (default: 1.0)
    ///
    /// A candidate is accepted when the absolute scoring difference is strictly
    /// below this value.
    pub match_threshold: f32,

    /// Absolute amplitude at or below which a sample counts as silent (default: 0.1)
    pub silence_threshold: f32,

    /// Consecutive non-silent samples needed to end a silent region (default: 51)
    pub min_sustained_samples: usize,
}

impl RemovalConfig {
    /// Number of frames in one correlation window at `sample_rate`
    pub fn window_frames(&self, sample_rate: u32) -> usize {
        (self.chunk_minutes as f64 * 60.0 * sample_rate as f64).round() as usize
    }
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            chunk_minutes: CORRELATION_CHUNK_MINUTES_DEFAULT,
            match_threshold: MATCH_THRESHOLD_DEFAULT,
            silence_threshold: SILENCE_THRESHOLD,
            min_sustained_samples: MIN_SUSTAINED_SAMPLES,
        }
    }
}
