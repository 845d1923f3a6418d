//! Error types for the clip removal engine

use std::fmt;

/// Errors that can occur while detecting or removing reference clips
#[derive(Debug, Clone, PartialEq)]
pub enum RemovalError {
    /// Reference clip and recording sample rates disagree
    SampleRateMismatch {
        /// Sample rate of the recording
        recording: u32,
        /// Sample rate of the offending reference clip
        clip: u32,
    },

    /// Reference clip has no sustained non-silent region (carries the clip name)
    NoSustainedAudio(String),

    /// Recording contains no samples
    EmptyRecording,

    /// Reference clip contains no samples (carries the clip name)
    EmptyReferenceClip(String),

    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Audio encoding / writing error
    EncodingError(String),

    /// Reading or writing audio file tags failed
    TagError(String),
}

impl fmt::Display for RemovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalError::SampleRateMismatch { recording, clip } => write!(
                f,
                "Sample rates do not match: recording is {} Hz, reference clip is {} Hz",
                recording, clip
            ),
            RemovalError::NoSustainedAudio(name) => write!(
                f,
                "Reference clip '{}' has no sustained non-silent region",
                name
            ),
            RemovalError::EmptyRecording => write!(f, "Recording contains no samples"),
            RemovalError::EmptyReferenceClip(name) => {
                write!(f, "Reference clip '{}' contains no samples", name)
            }
            RemovalError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            RemovalError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            RemovalError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            RemovalError::TagError(msg) => write!(f, "Tag error: {}", msg),
        }
    }
}

impl std::error::Error for RemovalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_clip() {
        let err = RemovalError::NoSustainedAudio("jingle.wav".to_string());
        assert!(err.to_string().contains("jingle.wav"));
        assert!(err.to_string().contains("no sustained non-silent region"));
    }

    #[test]
    fn test_display_sample_rates() {
        let err = RemovalError::SampleRateMismatch {
            recording: 44100,
            clip: 48000,
        };
        let msg = err.to_string();
        assert!(msg.contains("44100") && msg.contains("48000"), "{}", msg);
    }
}
