//! # Stratum Clipcut
//!
//! Find and cut known short clips (ads, jingles, station idents) out of long
//! recordings.
//!
//! ## Features
//!
//! - **Silence-trimmed templates**: reference clips are matched on their audible part only
//! - **Windowed FFT cross-correlation**: long recordings are scanned in overlapping windows
//! - **Amplitude-normalized verification**: correlation peaks are confirmed by a sample-level score
//! - **Discard capture**: removed audio is kept, in order, for review
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_clipcut::{remove_reference_clips, ReferenceClip, RemovalConfig, Waveform};
//!
//! // Mono, f32, normalized
//! let recording = Waveform::new(vec![0.0f32; 44100 * 600], 44100);
//! let jingle = ReferenceClip::new("jingle", Waveform::new(vec![0.0f32; 44100 * 5], 44100))?;
//!
//! let outcome = remove_reference_clips(recording, vec![jingle], RemovalConfig::default(), true)?;
//! for r in &outcome.summary.ranges {
//!     println!("removed {:.2}s - {:.2}s", r.start_seconds, r.end_seconds);
//! }
//! # Ok::<(), stratum_clipcut::RemovalError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Reference clips → Silence trim ─┐
//!                                 ├→ Windowed correlation → Peak verification → Range removal
//! Recording ──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod editing;
pub mod error;
pub mod io;
pub mod matching;
pub mod preprocessing;
pub mod recording;
pub mod reference;
pub mod sink;
pub mod waveform;

// Re-export main types
pub use config::RemovalConfig;
pub use editing::report::{DetectionStats, RangeReport, RemovalSummary};
pub use error::RemovalError;
pub use matching::MatchRange;
pub use recording::Recording;
pub use reference::ReferenceClip;
pub use sink::{LogCrateSink, LogSink};
pub use waveform::Waveform;

/// Result of [`remove_reference_clips`]
#[derive(Debug, Clone)]
pub struct RemovalOutcome {
    /// Recording with every detected range removed
    pub trimmed: Waveform,
    /// Removed audio in chronological order (empty unless captured)
    pub discard: Waveform,
    /// Removed ranges in original recording frames, ascending by start
    pub ranges: Vec<MatchRange>,
    /// Serializable summary of the run
    pub summary: RemovalSummary,
}

/// Detect and remove every occurrence of `clips` in `recording`
///
/// Runs the whole pipeline on a fresh [`Recording`]: register, detect,
/// report, remove.
///
/// # Arguments
///
/// * `recording` - Mono recording to edit
/// * `clips` - Reference clips, already silence-trimmed
/// * `config` - Correlation window length and trimmer settings
/// * `capture_discard` - Keep the removed audio in `RemovalOutcome::discard`
///
/// # Errors
///
/// * `EmptyRecording` if the recording has no samples
/// * `SampleRateMismatch` if a clip's rate differs from the recording's
/// * `InvalidInput` if the correlation window is not longer than the longest clip
pub fn remove_reference_clips(
    recording: Waveform,
    clips: Vec<ReferenceClip>,
    config: RemovalConfig,
    capture_discard: bool,
) -> Result<RemovalOutcome, RemovalError> {
    use std::time::Instant;
    let start_time = Instant::now();

    let sample_rate = recording.sample_rate();
    let original_duration_seconds = recording.duration_seconds() as f64;

    log::debug!(
        "Starting clip removal: {} samples at {} Hz, {} reference clip(s)",
        recording.len(),
        sample_rate,
        clips.len()
    );

    let mut recording = Recording::new(recording, config)?;
    for clip in clips {
        recording.register_reference_clip(clip)?;
    }

    let detection = recording.detect_unwanted_ranges()?;
    let report = recording.range_report();
    let mut ranges = recording.detected_ranges().to_vec();
    ranges.sort_by_key(|r| r.start);

    let removal = recording.remove_detected_ranges(capture_discard);
    log::debug!(
        "Removed {} range(s), {} frames",
        removal.ranges_removed,
        removal.frames_removed
    );

    let (trimmed, discard) = recording.into_parts();
    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    let summary = RemovalSummary {
        sample_rate,
        original_duration_seconds,
        trimmed_duration_seconds: trimmed.duration_seconds() as f64,
        discard_duration_seconds: discard.duration_seconds() as f64,
        ranges: report,
        detection,
        processing_time_ms,
    };

    Ok(RemovalOutcome {
        trimmed,
        discard,
        ranges,
        summary,
    })
}
