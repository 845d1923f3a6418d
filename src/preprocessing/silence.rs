//! Silence trimming for reference clips
//!
//! A reference clip is matched against the recording by its audible part only.
//! Leading and trailing near-silence is cut away so that correlation and
//! scoring are not diluted by samples that carry no signal.
//!
//! # Algorithm
//!
//! 1. Scan from the front for the first run of `min_sustained_samples`
//!    consecutive samples with `|x| > threshold`; the run start is the
//!    leading boundary.
//! 2. Scan from the back the same way; the last sample of that run is the
//!    final kept sample.
//! 3. Keep `[trim_start, trim_end)`.

use crate::error::RemovalError;

/// Absolute amplitude at or below which a sample counts as silent
pub const SILENCE_THRESHOLD: f32 = 0.1;

/// Consecutive non-silent samples required to leave a silent region
pub const MIN_SUSTAINED_SAMPLES: usize = 51;

/// Silence trimming configuration
#[derive(Debug, Clone)]
pub struct SilenceTrimmer {
    /// Absolute amplitude threshold (default: 0.1)
    pub threshold: f32,

    /// Required run length of non-silent samples (default: 51)
    pub min_sustained_samples: usize,
}

impl Default for SilenceTrimmer {
    fn default() -> Self {
        Self {
            threshold: SILENCE_THRESHOLD,
            min_sustained_samples: MIN_SUSTAINED_SAMPLES,
        }
    }
}

/// Boundaries of the audible region of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimBounds {
    /// First kept frame
    pub start: usize,
    /// Exclusive end of the kept frames
    pub end: usize,
}

impl TrimBounds {
    /// Number of kept frames
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if nothing is kept
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl SilenceTrimmer {
    /// Find the audible region of `samples`
    ///
    /// # Arguments
    ///
    /// * `samples` - Mono clip samples
    /// * `clip_name` - Used to identify the clip in errors
    ///
    /// # Errors
    ///
    /// * `EmptyReferenceClip` if `samples` is empty
    /// * `NoSustainedAudio` if no qualifying run of non-silent samples exists
    pub fn find_bounds(&self, samples: &[f32], clip_name: &str) -> Result<TrimBounds, RemovalError> {
        if samples.is_empty() {
            return Err(RemovalError::EmptyReferenceClip(clip_name.to_string()));
        }

        if self.min_sustained_samples == 0 {
            return Err(RemovalError::InvalidInput(
                "Sustained run length must be at least 1".to_string(),
            ));
        }

        let start = self
            .first_sustained_run(samples.iter())
            .ok_or_else(|| RemovalError::NoSustainedAudio(clip_name.to_string()))?;

        // A forward run exists, so a backward one does too
        let from_back = self
            .first_sustained_run(samples.iter().rev())
            .ok_or_else(|| RemovalError::NoSustainedAudio(clip_name.to_string()))?;
        let end = samples.len() - from_back;

        log::debug!(
            "Trimmed clip '{}': kept [{}, {}) of {} samples",
            clip_name,
            start,
            end,
            samples.len()
        );

        Ok(TrimBounds { start, end })
    }

    /// Trim leading and trailing silence
    ///
    /// # Returns
    ///
    /// The kept samples and their bounds in the clip's original coordinates
    pub fn trim(&self, samples: &[f32], clip_name: &str) -> Result<(Vec<f32>, TrimBounds), RemovalError> {
        let bounds = self.find_bounds(samples, clip_name)?;
        Ok((samples[bounds.start..bounds.end].to_vec(), bounds))
    }

    /// Position (in iteration order) where the first sustained run begins
    fn first_sustained_run<'a>(&self, samples: impl Iterator<Item = &'a f32>) -> Option<usize> {
        let mut run = 0usize;
        for (i, &x) in samples.enumerate() {
            if x.abs() <= self.threshold {
                run = 0;
            } else {
                run += 1;
                if run == self.min_sustained_samples {
                    return Some(i + 1 - run);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(lead: usize, body: usize, tail: usize) -> Vec<f32> {
        let mut samples = vec![0.0f32; lead];
        samples.extend(vec![0.5f32; body]);
        samples.extend(vec![0.0f32; tail]);
        samples
    }

    #[test]
    fn test_trim_leading_and_trailing() {
        let samples = padded(100, 200, 40);
        let (trimmed, bounds) = SilenceTrimmer::default().trim(&samples, "clip").unwrap();
        assert_eq!(bounds, TrimBounds { start: 100, end: 300 });
        assert_eq!(trimmed.len(), 200);
    }

    #[test]
    fn test_boundary_is_run_start() {
        // A short burst that never reaches 51 samples is treated as silence
        let mut samples = vec![0.0f32; 10];
        samples.extend(vec![0.9f32; 30]);
        samples.extend(vec![0.0f32; 10]);
        samples.extend(vec![0.9f32; 60]);
        let bounds = SilenceTrimmer::default().find_bounds(&samples, "clip").unwrap();
        assert_eq!(bounds.start, 50);
        assert_eq!(bounds.end, 110);
    }

    #[test]
    fn test_threshold_is_inclusive_silence() {
        // Exactly 0.1 still counts as silent
        let mut samples = vec![0.1f32; 20];
        samples.extend(vec![-0.2f32; 51]);
        let bounds = SilenceTrimmer::default().find_bounds(&samples, "clip").unwrap();
        assert_eq!(bounds, TrimBounds { start: 20, end: 71 });
    }

    #[test]
    fn test_trim_is_idempotent() {
        let samples = padded(37, 120, 13);
        let trimmer = SilenceTrimmer::default();
        let (once, _) = trimmer.trim(&samples, "clip").unwrap();
        let (twice, bounds) = trimmer.trim(&once, "clip").unwrap();
        assert_eq!(bounds, TrimBounds { start: 0, end: once.len() });
        assert_eq!(once, twice);
    }

    #[test]
    fn test_silent_clip_errors() {
        let samples = vec![0.05f32; 1000];
        let err = SilenceTrimmer::default().find_bounds(&samples, "quiet.wav").unwrap_err();
        assert_eq!(err, RemovalError::NoSustainedAudio("quiet.wav".to_string()));
    }

    #[test]
    fn test_run_too_short_errors() {
        let samples = padded(10, 50, 10);
        assert!(matches!(
            SilenceTrimmer::default().find_bounds(&samples, "short"),
            Err(RemovalError::NoSustainedAudio(_))
        ));
    }

    #[test]
    fn test_empty_clip_errors() {
        assert_eq!(
            SilenceTrimmer::default().find_bounds(&[], "empty").unwrap_err(),
            RemovalError::EmptyReferenceClip("empty".to_string())
        );
    }
}
