//! Overlapping correlation windows
//!
//! The recording is cut into windows of at most `window_frames` frames. Each
//! window starts `overlap` frames (longest reference clip + 1) before the end
//! of the previous one, so an occurrence straddling a boundary is fully
//! contained in the next window.

use crate::error::RemovalError;

/// One correlation window `[start, end)` in recording frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First frame
    pub start: usize,
    /// Exclusive end frame
    pub end: usize,
}

impl Window {
    /// Number of frames in the window
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the window covers no frames
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Iterator over the overlapping windows of a recording
#[derive(Debug, Clone)]
pub struct CorrelationWindows {
    recording_len: usize,
    window_frames: usize,
    overlap: usize,
    /// Exclusive end of the previous window
    cursor: usize,
}

impl CorrelationWindows {
    /// Plan windows over a recording
    ///
    /// # Arguments
    ///
    /// * `recording_len` - Recording length in frames
    /// * `window_frames` - Maximum window length in frames
    /// * `longest_reference_len` - Longest untrimmed reference clip in frames
    ///
    /// # Errors
    ///
    /// Returns `RemovalError::InvalidInput` if a window is not longer than the
    /// overlap, since the cursor would then never advance
    pub fn new(
        recording_len: usize,
        window_frames: usize,
        longest_reference_len: usize,
    ) -> Result<Self, RemovalError> {
        let overlap = longest_reference_len + 1;
        if window_frames <= overlap {
            return Err(RemovalError::InvalidInput(format!(
                "Correlation window of {} frames must be longer than the longest reference clip + 1 ({} frames)",
                window_frames, overlap
            )));
        }

        Ok(Self {
            recording_len,
            window_frames,
            overlap,
            cursor: 0,
        })
    }
}

impl Iterator for CorrelationWindows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.cursor >= self.recording_len {
            return None;
        }

        let start = self.cursor.saturating_sub(self.overlap);
        let end = (start + self.window_frames).min(self.recording_len);
        self.cursor = end;
        Some(Window { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_window_for_short_recording() {
        let windows: Vec<Window> = CorrelationWindows::new(10_000, 1_800_000, 300)
            .unwrap()
            .collect();
        assert_eq!(windows, vec![Window { start: 0, end: 10_000 }]);
    }

    #[test]
    fn test_windows_overlap_by_longest_clip() {
        let windows: Vec<Window> = CorrelationWindows::new(10_000, 3_000, 300).unwrap().collect();
        assert_eq!(
            windows,
            vec![
                Window { start: 0, end: 3_000 },
                Window { start: 2_699, end: 5_699 },
                Window { start: 5_398, end: 8_398 },
                Window { start: 8_097, end: 10_000 },
            ]
        );
    }

    #[test]
    fn test_windows_cover_recording() {
        let len = 12_345;
        let mut covered = vec![false; len];
        for w in CorrelationWindows::new(len, 1_000, 99).unwrap() {
            assert!(w.len() <= 1_000);
            covered[w.start..w.end].iter_mut().for_each(|c| *c = true);
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn test_empty_recording_has_no_windows() {
        assert_eq!(CorrelationWindows::new(0, 1_000, 10).unwrap().count(), 0);
    }

    #[test]
    fn test_window_too_short() {
        assert!(CorrelationWindows::new(10_000, 301, 300).is_err());
        assert!(CorrelationWindows::new(10_000, 302, 300).is_ok());
    }
}
