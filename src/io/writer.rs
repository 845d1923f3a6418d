//! WAV output using hound

use crate::error::RemovalError;
use crate::waveform::Waveform;
use std::path::Path;

/// Write a mono waveform as 32-bit float WAV
///
/// Parent directories must already exist.
///
/// # Errors
///
/// Returns `RemovalError::EncodingError` if the file cannot be created or written
pub fn write_wav(path: impl AsRef<Path>, waveform: &Waveform) -> Result<(), RemovalError> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let encode_err = |e: hound::Error| RemovalError::EncodingError(format!("{}: {}", path.display(), e));

    let mut writer = hound::WavWriter::create(path, spec).map_err(encode_err)?;
    for &sample in waveform.samples() {
        writer.write_sample(sample).map_err(encode_err)?;
    }
    writer.finalize().map_err(encode_err)?;

    log::debug!(
        "Wrote {} frames at {} Hz to {}",
        waveform.len(),
        waveform.sample_rate(),
        path.display()
    );
    Ok(())
}
