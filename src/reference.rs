//! Reference (unwanted) clips
//!
//! A reference clip is the short segment to find and cut. Its leading and
//! trailing silence is trimmed once at construction; the trimmed samples are
//! the correlation template, while the untrimmed length is what gets removed
//! from the recording.

use crate::config::{RemovalConfig, MATCH_THRESHOLD_DEFAULT};
use crate::error::RemovalError;
use crate::preprocessing::silence::SilenceTrimmer;
use crate::waveform::{mean_abs, Waveform};

/// A silence-trimmed clip to search for and remove
#[derive(Debug, Clone)]
pub struct ReferenceClip {
    name: String,
    trimmed: Waveform,
    trim_start: usize,
    trim_end: usize,
    original_len: usize,
    mean_abs_amplitude: f32,
    match_threshold: f32,
}

impl ReferenceClip {
    /// Build a clip with the default trimmer and match threshold
    ///
    /// # Errors
    ///
    /// * `EmptyReferenceClip` if the waveform has no samples
    /// * `NoSustainedAudio` if the clip has no sustained non-silent region
    pub fn new(name: impl Into<String>, waveform: Waveform) -> Result<Self, RemovalError> {
        Self::with_trimmer(name, waveform, &SilenceTrimmer::default(), MATCH_THRESHOLD_DEFAULT)
    }

    /// Build a clip with the trimmer settings and match threshold of `config`
    pub fn from_config(
        name: impl Into<String>,
        waveform: Waveform,
        config: &RemovalConfig,
    ) -> Result<Self, RemovalError> {
        let trimmer = SilenceTrimmer {
            threshold: config.silence_threshold,
            min_sustained_samples: config.min_sustained_samples,
        };
        Self::with_trimmer(name, waveform, &trimmer, config.match_threshold)
    }

    /// Build a clip with an explicit trimmer and match threshold
    pub fn with_trimmer(
        name: impl Into<String>,
        waveform: Waveform,
        trimmer: &SilenceTrimmer,
        match_threshold: f32,
    ) -> Result<Self, RemovalError> {
        let name = name.into();

        if match_threshold.is_nan() || match_threshold <= 0.0 {
            return Err(RemovalError::InvalidInput(format!(
                "Match threshold for '{}' must be positive, got {}",
                name, match_threshold
            )));
        }

        let original_len = waveform.len();
        let sample_rate = waveform.sample_rate();
        let (samples, bounds) = trimmer.trim(waveform.samples(), &name)?;
        let mean_abs_amplitude = mean_abs(&samples);

        log::debug!(
            "Reference clip '{}': {} samples, trimmed to [{}, {}), mean |x| = {:.4}",
            name,
            original_len,
            bounds.start,
            bounds.end,
            mean_abs_amplitude
        );

        Ok(Self {
            name,
            trimmed: Waveform::new(samples, sample_rate),
            trim_start: bounds.start,
            trim_end: bounds.end,
            original_len,
            mean_abs_amplitude,
            match_threshold,
        })
    }

    /// Replace the match threshold (builder style, before registration)
    pub fn with_match_threshold(mut self, match_threshold: f32) -> Result<Self, RemovalError> {
        if match_threshold.is_nan() || match_threshold <= 0.0 {
            return Err(RemovalError::InvalidInput(format!(
                "Match threshold for '{}' must be positive, got {}",
                self.name, match_threshold
            )));
        }
        self.match_threshold = match_threshold;
        Ok(self)
    }

    /// Clip name used in logs and errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed correlation template
    pub fn trimmed(&self) -> &Waveform {
        &self.trimmed
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.trimmed.sample_rate()
    }

    /// Frames of leading silence removed
    pub fn trim_start(&self) -> usize {
        self.trim_start
    }

    /// Exclusive end of the kept frames, in untrimmed coordinates
    pub fn trim_end(&self) -> usize {
        self.trim_end
    }

    /// Frames of trailing silence removed
    pub fn trailing_trim(&self) -> usize {
        self.original_len - self.trim_end
    }

    /// Untrimmed length; the span removed for each match
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Trimmed template length
    pub fn trimmed_len(&self) -> usize {
        self.trimmed.len()
    }

    /// Mean absolute amplitude of the trimmed template
    pub fn mean_abs_amplitude(&self) -> f32 {
        self.mean_abs_amplitude
    }

    /// Maximum acceptable absolute scoring difference
    pub fn match_threshold(&self) -> f32 {
        self.match_threshold
    }
}
