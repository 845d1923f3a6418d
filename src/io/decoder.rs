//! Audio decoding using Symphonia

use crate::error::RemovalError;
use crate::waveform::Waveform;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded PCM audio, one buffer per channel
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Planar samples, normalized to [-1.0, 1.0]
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Downmix to a mono waveform
    pub fn into_waveform(self) -> Result<Waveform, RemovalError> {
        Waveform::from_channels(&self.channels, self.sample_rate)
    }

    /// Frames per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }
}

/// Decode an audio file to PCM samples
///
/// # Arguments
///
/// * `path` - Path to an audio file in any format Symphonia probes
///   (mp3, aac, ogg/vorbis, flac, wav, mp4)
///
/// # Errors
///
/// Returns `RemovalError::DecodingError` if the file cannot be opened,
/// probed or decoded. Corrupt packets are skipped.
pub fn decode_audio(path: impl AsRef<Path>) -> Result<DecodedAudio, RemovalError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)
        .map_err(|e| RemovalError::DecodingError(format!("{}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| RemovalError::DecodingError(format!("{}: {}", path.display(), e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            RemovalError::DecodingError(format!(
                "{}: no supported audio tracks found",
                path.display()
            ))
        })?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| RemovalError::DecodingError(format!("{}: {}", path.display(), e)))?;

    let mut channels: Vec<Vec<f32>> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(RemovalError::DecodingError(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping corrupt packet in {}: {}", path.display(), e);
                continue;
            }
            Err(e) => {
                return Err(RemovalError::DecodingError(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let spec = *decoded.spec();
        let channel_count = spec.channels.count();
        if sample_rate.is_none() {
            sample_rate = Some(spec.rate);
        }
        if channels.is_empty() {
            channels = vec![Vec::new(); channel_count];
        }

        let buf = sample_buf.get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
        if buf.capacity() < decoded.capacity() * channel_count {
            *buf = SampleBuffer::new(decoded.capacity() as u64, spec);
        }
        buf.copy_interleaved_ref(decoded);

        for frame in buf.samples().chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame.iter()) {
                channel.push(sample);
            }
        }
    }

    let sample_rate = sample_rate.ok_or_else(|| {
        RemovalError::DecodingError(format!("{}: unknown sample rate", path.display()))
    })?;

    if channels.is_empty() {
        return Err(RemovalError::DecodingError(format!(
            "{}: no audio decoded",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {}: {} channel(s), {} frames at {} Hz",
        path.display(),
        channels.len(),
        channels[0].len(),
        sample_rate
    );

    Ok(DecodedAudio {
        channels,
        sample_rate,
    })
}
