//! Channel mixing utilities (stereo to mono conversion)
//!
//! Matching runs on a single channel. Multi-channel input is reduced to its
//! first two channels and averaged: `(L + R) / 2`. Mono input passes through
//! untouched, so downmixing is idempotent.

use crate::error::RemovalError;

/// Convert stereo to mono by averaging the two channels
///
/// # Arguments
///
/// * `left` - Left channel samples
/// * `right` - Right channel samples
///
/// # Returns
///
/// Mono samples, same length as the inputs
///
/// # Errors
///
/// Returns `RemovalError::InvalidInput` if the channel lengths differ
pub fn stereo_to_mono(left: &[f32], right: &[f32]) -> Result<Vec<f32>, RemovalError> {
    if left.len() != right.len() {
        return Err(RemovalError::InvalidInput(format!(
            "Channel lengths differ: left={}, right={}",
            left.len(),
            right.len()
        )));
    }

    Ok(left
        .iter()
        .zip(right.iter())
        .map(|(&l, &r)| (l + r) / 2.0)
        .collect())
}

/// Downmix planar channel buffers to mono
///
/// Only the first two channels take part in the mix; a single channel is
/// returned unchanged.
pub fn downmix_channels(channels: &[Vec<f32>]) -> Result<Vec<f32>, RemovalError> {
    match channels {
        [] => Err(RemovalError::InvalidInput(
            "No channels to downmix".to_string(),
        )),
        [mono] => Ok(mono.clone()),
        [left, right, rest @ ..] => {
            if !rest.is_empty() {
                log::debug!(
                    "Ignoring {} channel(s) beyond the first two while downmixing",
                    rest.len()
                );
            }
            stereo_to_mono(left, right)
        }
    }
}

/// Downmix interleaved samples (`L R L R ...`) to mono
///
/// # Errors
///
/// Returns `RemovalError::InvalidInput` if `channels` is zero or the buffer
/// length is not a multiple of `channels`
pub fn downmix_interleaved(samples: &[f32], channels: usize) -> Result<Vec<f32>, RemovalError> {
    if channels == 0 {
        return Err(RemovalError::InvalidInput(
            "Invalid channel count: 0".to_string(),
        ));
    }

    if samples.len() % channels != 0 {
        return Err(RemovalError::InvalidInput(format!(
            "Interleaved buffer of {} samples is not a multiple of {} channels",
            samples.len(),
            channels
        )));
    }

    if channels == 1 {
        return Ok(samples.to_vec());
    }

    Ok(samples
        .chunks_exact(channels)
        .map(|frame| (frame[0] + frame[1]) / 2.0)
        .collect())
}
