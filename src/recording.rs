//! Recording under edit
//!
//! [`Recording`] owns the long waveform, the registered reference clips, the
//! ranges detected so far and the discard buffer. The caller drives it in
//! three steps: register clips, detect, remove.
//!
//! ```no_run
//! use stratum_clipcut::{Recording, ReferenceClip, RemovalConfig, Waveform};
//!
//! let recording = Waveform::new(vec![0.0f32; 44100 * 60], 44100);
//! let jingle = Waveform::new(vec![0.0f32; 44100 * 5], 44100);
//!
//! let mut recording = Recording::new(recording, RemovalConfig::default())?;
//! recording.register_reference_clip(ReferenceClip::new("jingle", jingle)?)?;
//! recording.detect_unwanted_ranges()?;
//! for r in recording.range_report() {
//!     println!("{:.2}s - {:.2}s", r.start_seconds, r.end_seconds);
//! }
//! recording.remove_detected_ranges(true);
//! # Ok::<(), stratum_clipcut::RemovalError>(())
//! ```

use crate::config::RemovalConfig;
use crate::editing::remover::{remove_ranges, RemovalStats};
use crate::editing::report::{DetectionStats, RangeReport};
use crate::error::RemovalError;
use crate::matching::collector::RangeCollector;
use crate::matching::correlation::cross_correlate_full;
use crate::matching::verifier::{extract_matches, Verification};
use crate::matching::window::{CorrelationWindows, Window};
use crate::matching::MatchRange;
use crate::reference::ReferenceClip;
use crate::sink::{emit, LogSink};
use crate::waveform::Waveform;
use std::sync::Arc;

/// A recording with its reference clips, detected ranges and discard buffer
pub struct Recording {
    waveform: Waveform,
    discard: Vec<f32>,
    clips: Vec<ReferenceClip>,
    ranges: RangeCollector,
    config: RemovalConfig,
    sink: Option<Arc<dyn LogSink>>,
}

impl std::fmt::Debug for Recording {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recording")
            .field("frames", &self.waveform.len())
            .field("sample_rate", &self.waveform.sample_rate())
            .field("discard_frames", &self.discard.len())
            .field("clips", &self.clips.len())
            .field("ranges", &self.ranges.len())
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Recording {
    /// Take ownership of a waveform for editing
    ///
    /// # Errors
    ///
    /// * `EmptyRecording` if the waveform has no samples
    /// * `InvalidInput` for a zero sample rate or a non-positive chunk length
    pub fn new(waveform: Waveform, config: RemovalConfig) -> Result<Self, RemovalError> {
        if waveform.is_empty() {
            return Err(RemovalError::EmptyRecording);
        }

        if waveform.sample_rate() == 0 {
            return Err(RemovalError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }

        if config.chunk_minutes.is_nan() || config.chunk_minutes <= 0.0 {
            return Err(RemovalError::InvalidInput(format!(
                "Invalid correlation chunk length: {} minutes",
                config.chunk_minutes
            )));
        }

        log::debug!(
            "Recording: {} samples at {} Hz ({:.1}s)",
            waveform.len(),
            waveform.sample_rate(),
            waveform.duration_seconds()
        );

        Ok(Self {
            waveform,
            discard: Vec::new(),
            clips: Vec::new(),
            ranges: RangeCollector::new(),
            config,
            sink: None,
        })
    }

    /// Attach a milestone sink
    pub fn with_sink(self, sink: impl LogSink + 'static) -> Self {
        self.with_shared_sink(Arc::new(sink))
    }

    /// Attach a sink the caller keeps using after the recording is consumed
    pub fn with_shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Register a clip to search for
    ///
    /// # Errors
    ///
    /// Returns `SampleRateMismatch` if the clip's sample rate differs from the
    /// recording's
    pub fn register_reference_clip(&mut self, clip: ReferenceClip) -> Result<(), RemovalError> {
        if clip.sample_rate() != self.waveform.sample_rate() {
            return Err(RemovalError::SampleRateMismatch {
                recording: self.waveform.sample_rate(),
                clip: clip.sample_rate(),
            });
        }

        log::debug!(
            "Registered reference clip '{}' ({} frames)",
            clip.name(),
            clip.original_len()
        );
        self.clips.push(clip);
        Ok(())
    }

    /// Registered reference clips
    pub fn reference_clips(&self) -> &[ReferenceClip] {
        &self.clips
    }

    /// Longest untrimmed reference clip in frames (0 with no clips)
    pub fn longest_reference_len(&self) -> usize {
        self.clips
            .iter()
            .map(ReferenceClip::original_len)
            .max()
            .unwrap_or(0)
    }

    /// Find every occurrence of the registered clips
    ///
    /// Clears previously detected ranges, then correlates each window of the
    /// recording against each clip and verifies the peaks. The ranges are
    /// available through [`detected_ranges`](Self::detected_ranges) afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a correlation window is not longer than the
    /// longest reference clip
    pub fn detect_unwanted_ranges(&mut self) -> Result<DetectionStats, RemovalError> {
        let Self {
            waveform,
            clips,
            ranges,
            config,
            sink,
            ..
        } = self;
        let sink = sink.as_deref();

        ranges.clear();
        let mut stats = DetectionStats::default();

        if clips.is_empty() {
            log::warn!("No reference clips registered; nothing to detect");
            return Ok(stats);
        }

        let samples = waveform.samples();
        let longest = clips.iter().map(ReferenceClip::original_len).max().unwrap_or(0);
        let windows = CorrelationWindows::new(
            samples.len(),
            config.window_frames(waveform.sample_rate()),
            longest,
        )?;

        for window in windows {
            stats.windows += 1;
            emit(sink, || {
                format!(
                    "Doing correlation on {} frames starting at {}.",
                    window.len(),
                    window.start
                )
            });

            for verification in scan_window(samples, window, clips, sink)? {
                stats.correlations += 1;
                stats.rounds += verification.rounds;
                stats.matches += verification.ranges.len();
                ranges.extend(verification.ranges);
            }
        }

        stats.duplicates_dropped = ranges.duplicates_dropped();

        log::debug!(
            "Detection done: {} windows, {} correlations, {} ranges",
            stats.windows,
            stats.correlations,
            ranges.len()
        );

        Ok(stats)
    }

    /// Ranges detected by the last detection run, in discovery order
    pub fn detected_ranges(&self) -> &[MatchRange] {
        self.ranges.ranges()
    }

    /// Detected ranges in seconds, ascending by start
    pub fn range_report(&self) -> Vec<RangeReport> {
        let sample_rate = self.waveform.sample_rate();
        self.ranges
            .sorted_by_start()
            .iter()
            .map(|r| RangeReport::from_range(r, sample_rate))
            .collect()
    }

    /// Delete the detected ranges from the recording
    ///
    /// The ranges are consumed. With `capture_discard` the removed audio is
    /// added to the discard buffer in chronological order.
    pub fn remove_detected_ranges(&mut self, capture_discard: bool) -> RemovalStats {
        let ranges = self.ranges.take();
        let discard = if capture_discard {
            Some(&mut self.discard)
        } else {
            None
        };
        remove_ranges(
            self.waveform.samples_mut(),
            &ranges,
            discard,
            self.sink.as_deref(),
        )
    }

    /// Current (trimmed) waveform
    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    /// Audio removed so far
    pub fn discard_samples(&self) -> &[f32] {
        &self.discard
    }

    /// Discard buffer as a waveform at the recording's sample rate
    pub fn discard(&self) -> Waveform {
        Waveform::new(self.discard.clone(), self.waveform.sample_rate())
    }

    /// Removal configuration
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Consume into `(trimmed, discard)`
    pub fn into_parts(self) -> (Waveform, Waveform) {
        let sample_rate = self.waveform.sample_rate();
        (self.waveform, Waveform::new(self.discard, sample_rate))
    }
}

/// Correlate one window against one clip and verify the peaks
///
/// The correlation buffer is dropped before returning.
fn scan_clip(
    recording: &[f32],
    window: Window,
    clip: &ReferenceClip,
    sink: Option<&dyn LogSink>,
) -> Result<Verification, RemovalError> {
    let mut correlation =
        cross_correlate_full(&recording[window.start..window.end], clip.trimmed().samples())?;
    emit(sink, || {
        format!("Did correlation with '{}'. Len={}", clip.name(), correlation.len())
    });
    Ok(extract_matches(
        &mut correlation,
        window.start,
        recording,
        clip,
        sink,
    ))
}

#[cfg(not(feature = "parallel"))]
fn scan_window(
    recording: &[f32],
    window: Window,
    clips: &[ReferenceClip],
    sink: Option<&dyn LogSink>,
) -> Result<Vec<Verification>, RemovalError> {
    clips
        .iter()
        .map(|clip| scan_clip(recording, window, clip, sink))
        .collect()
}

/// Clips of one window run concurrently; results keep registration order
#[cfg(feature = "parallel")]
fn scan_window(
    recording: &[f32],
    window: Window,
    clips: &[ReferenceClip],
    sink: Option<&dyn LogSink>,
) -> Result<Vec<Verification>, RemovalError> {
    use rayon::prelude::*;

    clips
        .par_iter()
        .map(|clip| scan_clip(recording, window, clip, sink))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(len: usize, sample_rate: u32) -> ReferenceClip {
        ReferenceClip::new("clip", Waveform::new(vec![0.5; len], sample_rate)).unwrap()
    }

    #[test]
    fn test_empty_recording_rejected() {
        let err = Recording::new(Waveform::new(vec![], 1000), RemovalConfig::default()).unwrap_err();
        assert_eq!(err, RemovalError::EmptyRecording);
    }

    #[test]
    fn test_invalid_chunk_minutes() {
        let config = RemovalConfig {
            chunk_minutes: 0.0,
            ..Default::default()
        };
        assert!(Recording::new(Waveform::new(vec![0.0; 10], 1000), config).is_err());
    }

    #[test]
    fn test_sample_rate_mismatch() {
        let mut recording =
            Recording::new(Waveform::new(vec![0.0; 1000], 44100), RemovalConfig::default()).unwrap();
        let err = recording.register_reference_clip(clip(100, 48000)).unwrap_err();
        assert_eq!(
            err,
            RemovalError::SampleRateMismatch {
                recording: 44100,
                clip: 48000
            }
        );
        assert!(recording.reference_clips().is_empty());
    }

    #[test]
    fn test_longest_reference_len() {
        let mut recording =
            Recording::new(Waveform::new(vec![0.0; 1000], 1000), RemovalConfig::default()).unwrap();
        assert_eq!(recording.longest_reference_len(), 0);
        recording.register_reference_clip(clip(100, 1000)).unwrap();
        recording.register_reference_clip(clip(250, 1000)).unwrap();
        assert_eq!(recording.longest_reference_len(), 250);
    }

    #[test]
    fn test_detect_without_clips() {
        let mut recording =
            Recording::new(Waveform::new(vec![0.1; 1000], 1000), RemovalConfig::default()).unwrap();
        let stats = recording.detect_unwanted_ranges().unwrap();
        assert_eq!(stats, DetectionStats::default());
        assert!(recording.detected_ranges().is_empty());
    }

    #[test]
    fn test_window_shorter_than_clip() {
        let config = RemovalConfig {
            chunk_minutes: 0.001, // 60 frames at 1 kHz
            ..Default::default()
        };
        let mut recording = Recording::new(Waveform::new(vec![0.0; 1000], 1000), config).unwrap();
        recording.register_reference_clip(clip(100, 1000)).unwrap();
        assert!(matches!(
            recording.detect_unwanted_ranges(),
            Err(RemovalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_into_parts_after_removal() {
        // 10 frames of lead-in, a +/- square burst, 20 frames of tail
        let mut template = vec![0.0f32; 10];
        template.extend(vec![0.5f32; 30]);
        template.extend(vec![-0.5f32; 30]);
        template.extend(vec![0.0f32; 20]);

        let mut samples = vec![0.0f32; 1000];
        samples[400..490].copy_from_slice(&template);

        let mut recording =
            Recording::new(Waveform::new(samples, 1000), RemovalConfig::default()).unwrap();
        recording
            .register_reference_clip(ReferenceClip::new("t", Waveform::new(template, 1000)).unwrap())
            .unwrap();

        recording.detect_unwanted_ranges().unwrap();
        assert_eq!(recording.detected_ranges(), &[MatchRange::new(400, 490)]);

        let stats = recording.remove_detected_ranges(true);
        assert_eq!(stats.frames_removed, 90);
        assert!(recording.detected_ranges().is_empty());

        let (trimmed, discard) = recording.into_parts();
        assert_eq!(trimmed.len(), 910);
        assert_eq!(discard.len(), 90);
        assert_eq!(discard.sample_rate(), 1000);
    }

    #[test]
    fn test_shared_sink_outlives_recording() {
        use std::sync::Mutex;

        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let collected = Arc::clone(&lines);
        let sink: Arc<dyn LogSink> =
            Arc::new(move |m: &str| collected.lock().unwrap().push(m.to_string()));

        let mut recording =
            Recording::new(Waveform::new(vec![0.0; 1000], 1000), RemovalConfig::default())
                .unwrap()
                .with_shared_sink(Arc::clone(&sink));
        recording.register_reference_clip(clip(100, 1000)).unwrap();
        recording.detect_unwanted_ranges().unwrap();
        let _ = recording.into_parts();

        sink.log("saved");
        let lines = lines.lock().unwrap();
        assert!(lines.iter().any(|l| l.starts_with("Doing correlation on")));
        assert_eq!(lines.last().map(String::as_str), Some("saved"));
    }
}
