//! Mono sample buffers

use crate::error::RemovalError;
use crate::preprocessing::channel_mixer::{downmix_channels, downmix_interleaved};

/// Mean absolute amplitude of `samples` (0.0 for an empty slice)
///
/// Accumulates in `f64` so long buffers do not lose precision.
pub fn mean_abs(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&x| (x as f64).abs()).sum();
    (sum / samples.len() as f64) as f32
}

/// Single-channel audio with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap mono samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Build from planar channel buffers, downmixing to mono
    pub fn from_channels(channels: &[Vec<f32>], sample_rate: u32) -> Result<Self, RemovalError> {
        Ok(Self::new(downmix_channels(channels)?, sample_rate))
    }

    /// Build from interleaved samples, downmixing to mono
    pub fn from_interleaved(
        samples: &[f32],
        channels: usize,
        sample_rate: u32,
    ) -> Result<Self, RemovalError> {
        Ok(Self::new(downmix_interleaved(samples, channels)?, sample_rate))
    }

    /// Samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Mean absolute amplitude
    pub fn mean_abs_amplitude(&self) -> f32 {
        mean_abs(&self.samples)
    }

    /// Consume and return the samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut Vec<f32> {
        &mut self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_abs() {
        assert_eq!(mean_abs(&[]), 0.0);
        assert!((mean_abs(&[0.5, -0.5, 1.0, -1.0]) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_from_channels_downmixes() {
        let waveform = Waveform::from_channels(&[vec![1.0, 0.0], vec![0.0, 1.0]], 8000).unwrap();
        assert_eq!(waveform.samples(), &[0.5, 0.5]);
        assert_eq!(waveform.sample_rate(), 8000);
    }

    #[test]
    fn test_duration() {
        let waveform = Waveform::new(vec![0.0; 22050], 44100);
        assert!((waveform.duration_seconds() - 0.5).abs() < 1e-6);
    }
}
