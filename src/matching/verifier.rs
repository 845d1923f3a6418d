//! Peak verification
//!
//! A correlation peak only says where the clip is *most likely* to be; it does
//! not say the clip is actually there. Each peak is therefore checked against
//! the recording:
//!
//! 1. `peak = argmax(correlation)`
//! 2. `check_offset = peak + window_start - (trimmed_len - 1)`: where the
//!    trimmed clip would begin
//! 3. `match_offset = check_offset - trim_start`: where the untrimmed clip
//!    would begin (clamped to 0)
//! 4. Rescale `recording[check_offset..check_offset + trimmed_len]` to the
//!    clip's mean absolute amplitude and take the signed sum of the
//!    differences to the template
//! 5. Accept iff `|diff| < match_threshold`, suppress the confirmed region in
//!    the correlation and search again; the first rejection ends the search
//!    for this (window, clip) pair
//!
//! The signed, unsquared sum lets positive and negative differences cancel.
//! That is the scoring contract; do not replace it with an energy measure.

use super::correlation::argmax;
use super::MatchRange;
use crate::reference::ReferenceClip;
use crate::sink::{emit, LogSink};
use crate::waveform::mean_abs;

/// Mean amplitude below which a candidate slice is considered silent
const EPSILON: f32 = 1e-10;

/// Best remaining alignment in a correlation result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    /// Index into the correlation array
    pub peak_index: usize,
    /// Correlation value at the peak
    pub peak_value: f32,
    /// Recording position where the trimmed clip would begin (may be negative)
    pub check_offset: i64,
    /// Recording position where the untrimmed clip would begin, clamped to 0
    pub match_offset: usize,
    /// Frames by which `match_offset` was moved up to reach 0
    pub clamped_by: usize,
}

/// Why a candidate could not be scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The trimmed clip would start before the recording
    BeforeStart,
    /// The trimmed clip would run past the end of the recording
    PastEnd,
    /// The candidate slice carries no signal
    Silent,
    /// The peak lies inside an already confirmed region
    Suppressed,
}

/// Ranges confirmed in one (window, clip) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Verification {
    /// Confirmed ranges in discovery order
    pub ranges: Vec<MatchRange>,
    /// Rounds attempted, including the final unsuccessful one
    pub rounds: usize,
}

/// Map the current correlation maximum back to recording coordinates
///
/// Returns `None` for an empty correlation array.
pub fn locate_peak(
    correlation: &[f32],
    window_start: usize,
    clip: &ReferenceClip,
) -> Option<PeakCandidate> {
    let peak_index = argmax(correlation)?;
    let base = peak_index as i64 + window_start as i64;
    let check_offset = base - (clip.trimmed_len() as i64 - 1);
    let raw_match = base - (clip.trimmed_len() as i64 + clip.trim_start() as i64 - 1);

    let (match_offset, clamped_by) = if raw_match < 0 {
        (0, raw_match.unsigned_abs() as usize)
    } else {
        (raw_match as usize, 0)
    };

    Some(PeakCandidate {
        peak_index,
        peak_value: correlation[peak_index],
        check_offset,
        match_offset,
        clamped_by,
    })
}

/// Amplitude-normalized signed difference between a recording slice and the clip
///
/// # Arguments
///
/// * `recording` - Full recording samples
/// * `check_offset` - Where the trimmed clip would begin
/// * `clip` - Reference clip
pub fn score_candidate(
    recording: &[f32],
    check_offset: usize,
    clip: &ReferenceClip,
) -> Result<f64, Rejection> {
    let template = clip.trimmed().samples();
    let end = check_offset + template.len();
    if end > recording.len() {
        return Err(Rejection::PastEnd);
    }

    let matched = &recording[check_offset..end];
    let mean = mean_abs(matched);
    if mean < EPSILON {
        return Err(Rejection::Silent);
    }

    // Adjust for volume differences
    let scale = clip.mean_abs_amplitude() as f64 / mean as f64;
    Ok(matched
        .iter()
        .zip(template.iter())
        .map(|(&m, &t)| m as f64 * scale - t as f64)
        .sum())
}

/// Extract every confirmed occurrence of `clip` from one correlation result
///
/// The correlation is modified in place: each confirmed region is zeroed so it
/// cannot be found again.
///
/// # Arguments
///
/// * `correlation` - Full correlation of `recording[window_start..]` against the trimmed clip
/// * `window_start` - First recording frame of the window
/// * `recording` - Full recording samples
/// * `clip` - Reference clip the correlation was computed against
/// * `sink` - Optional milestone sink
pub fn extract_matches(
    correlation: &mut [f32],
    window_start: usize,
    recording: &[f32],
    clip: &ReferenceClip,
    sink: Option<&dyn LogSink>,
) -> Verification {
    let mut result = Verification::default();
    let mut suppressed: Vec<(usize, usize)> = Vec::new();

    loop {
        result.rounds += 1;
        emit(sink, || format!("Round {} getting peak correlation.", result.rounds));

        let Some(candidate) = locate_peak(correlation, window_start, clip) else {
            break;
        };

        if suppressed
            .iter()
            .any(|&(from, to)| (from..to).contains(&candidate.peak_index))
        {
            // Only reachable once every remaining value is <= 0; not scored
            log::debug!("{:?} at correlation index {}", Rejection::Suppressed, candidate.peak_index);
            break;
        }

        if candidate.clamped_by > 0 {
            log::warn!(
                "Moving match offset from -{} to 0 for clip '{}'",
                candidate.clamped_by,
                clip.name()
            );
            emit(sink, || {
                format!(
                    "Moving offset_samples from -{} to 0. moved_offset={}",
                    candidate.clamped_by, candidate.clamped_by
                )
            });
        }

        // TODO: decide whether a clamped match near the recording start should be scored
        // over the partial slice instead of being dropped here.
        let Ok(check_offset) = usize::try_from(candidate.check_offset) else {
            log::debug!("{:?}: check offset {}", Rejection::BeforeStart, candidate.check_offset);
            break;
        };

        let diff = match score_candidate(recording, check_offset, clip) {
            Ok(diff) => diff,
            Err(rejection) => {
                log::debug!("{:?} at check offset {}", rejection, check_offset);
                emit(sink, || format!("Candidate at {} rejected: {:?}", check_offset, rejection));
                break;
            }
        };

        emit(sink, || {
            format!(
                "Calculated difference: {}. correlation={}",
                diff, candidate.peak_value
            )
        });

        if diff.abs() >= clip.match_threshold() as f64 {
            break;
        }

        let range = MatchRange::new(
            candidate.match_offset,
            candidate.match_offset + clip.original_len(),
        );
        emit(sink, || {
            format!(
                "Found unwanted clip at {} - {}",
                range.start,
                range.start as f64 / clip.sample_rate().max(1) as f64
            )
        });
        result.ranges.push(range);

        // Zero out the confirmed range so it won't show as the peak next round
        let from = range.start.saturating_sub(window_start).min(correlation.len());
        let to = range.end.saturating_sub(window_start).min(correlation.len());
        correlation[from..to].iter_mut().for_each(|c| *c = 0.0);
        suppressed.push((from, to));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::Waveform;

    /// 60 samples of 0.5: no silence to trim, mean |x| = 0.5
    fn flat_clip(threshold: f32) -> ReferenceClip {
        ReferenceClip::new("flat", Waveform::new(vec![0.5; 60], 1000))
            .unwrap()
            .with_match_threshold(threshold)
            .unwrap()
    }

    /// Recording with the flat clip at 100, one sample inverted so diff = -1.0
    fn recording_with_flipped_sample() -> Vec<f32> {
        let mut recording = vec![0.0f32; 200];
        recording[100..160].iter_mut().for_each(|x| *x = 0.5);
        recording[100] = -0.5;
        recording
    }

    fn correlation_peaking_at(index: usize, len: usize) -> Vec<f32> {
        let mut corr = vec![0.0f32; len];
        corr[index] = 1.0;
        corr
    }

    #[test]
    fn test_locate_peak_offsets() {
        let mut samples = vec![0.0f32; 10];
        samples.extend(vec![0.5f32; 60]);
        let clip = ReferenceClip::new("lead", Waveform::new(samples, 1000)).unwrap();
        assert_eq!(clip.trim_start(), 10);

        let corr = correlation_peaking_at(200, 400);
        let c = locate_peak(&corr, 1000, &clip).unwrap();
        assert_eq!(c.peak_index, 200);
        assert_eq!(c.check_offset, 1000 + 200 - 59);
        assert_eq!(c.match_offset, 1000 + 200 - 69);
        assert_eq!(c.clamped_by, 0);
    }

    #[test]
    fn test_locate_peak_clamps_negative_match_offset() {
        let mut samples = vec![0.0f32; 10];
        samples.extend(vec![0.5f32; 60]);
        let clip = ReferenceClip::new("lead", Waveform::new(samples, 1000)).unwrap();

        let corr = correlation_peaking_at(63, 200);
        let c = locate_peak(&corr, 0, &clip).unwrap();
        assert_eq!(c.check_offset, 4);
        assert_eq!(c.match_offset, 0);
        assert_eq!(c.clamped_by, 6);
    }

    #[test]
    fn test_score_exact_match_is_zero() {
        let clip = flat_clip(1.0);
        let mut recording = vec![0.0f32; 200];
        // Louder copy: normalization removes the gain difference
        recording[50..110].iter_mut().for_each(|x| *x = 0.8);
        let diff = score_candidate(&recording, 50, &clip).unwrap();
        assert!(diff.abs() < 1e-9, "diff = {}", diff);
    }

    #[test]
    fn test_score_rejections() {
        let clip = flat_clip(1.0);
        let recording = vec![0.0f32; 100];
        assert_eq!(score_candidate(&recording, 10, &clip), Err(Rejection::Silent));
        assert_eq!(score_candidate(&recording, 50, &clip), Err(Rejection::PastEnd));
    }

    #[test]
    fn test_diff_equal_to_threshold_is_rejected() {
        let clip = flat_clip(1.0);
        let recording = recording_with_flipped_sample();
        assert_eq!(score_candidate(&recording, 100, &clip), Ok(-1.0));

        let mut corr = correlation_peaking_at(159, recording.len() + 59);
        let result = extract_matches(&mut corr, 0, &recording, &clip, None);
        assert!(result.ranges.is_empty());
        assert_eq!(result.rounds, 1);
    }

    #[test]
    fn test_diff_below_threshold_is_accepted() {
        let clip = flat_clip(1.001);
        let recording = recording_with_flipped_sample();

        let mut corr = correlation_peaking_at(159, recording.len() + 59);
        let result = extract_matches(&mut corr, 0, &recording, &clip, None);
        assert_eq!(result.ranges, vec![MatchRange::new(100, 160)]);
        // Second round lands on index 0, which is before the recording start
        assert_eq!(result.rounds, 2);
        assert!(corr[100..160].iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_peak_in_zeroed_region_ends_search_unscored() {
        use std::sync::Mutex;

        let clip = flat_clip(1.0);
        let mut recording = vec![0.0f32; 200];
        recording[100..160].iter_mut().for_each(|x| *x = 0.5);
        let lines = Mutex::new(Vec::<String>::new());
        let sink = |m: &str| lines.lock().unwrap().push(m.to_string());

        // Everything outside the match is negative, so after zeroing the
        // maximum falls on the first zeroed index
        let mut corr = vec![-1.0f32; 259];
        corr[159] = 1.0;
        let result = extract_matches(&mut corr, 0, &recording, &clip, Some(&sink));

        assert_eq!(result.ranges, vec![MatchRange::new(100, 160)]);
        assert_eq!(result.rounds, 2);
        assert_eq!(argmax(&corr), Some(100));

        let lines = lines.into_inner().unwrap();
        let scored = lines
            .iter()
            .filter(|l| l.starts_with("Calculated difference"))
            .count();
        assert_eq!(scored, 1);
        assert!(!lines.iter().any(|l| l.starts_with("Candidate at")));
    }

    #[test]
    fn test_window_start_shifts_ranges() {
        let clip = flat_clip(1.0);
        let mut recording = vec![0.0f32; 1200];
        recording[1100..1160].iter_mut().for_each(|x| *x = 0.5);

        // Window starts at 1000; correlation index 159 -> trimmed clip at 1100
        let mut corr = correlation_peaking_at(159, 200 + 59);
        let result = extract_matches(&mut corr, 1000, &recording, &clip, None);
        assert_eq!(result.ranges, vec![MatchRange::new(1100, 1160)]);
    }

    #[test]
    fn test_sink_receives_milestones() {
        use std::sync::Mutex;

        let clip = flat_clip(1.0);
        let mut recording = vec![0.0f32; 200];
        recording[100..160].iter_mut().for_each(|x| *x = 0.5);
        let lines = Mutex::new(Vec::<String>::new());
        let sink = |m: &str| lines.lock().unwrap().push(m.to_string());

        let mut corr = correlation_peaking_at(159, 259);
        extract_matches(&mut corr, 0, &recording, &clip, Some(&sink));

        let lines = lines.into_inner().unwrap();
        assert!(lines.iter().any(|l| l.starts_with("Round 1")));
        assert!(lines.iter().any(|l| l.starts_with("Found unwanted clip at 100")));
    }
}
