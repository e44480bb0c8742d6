//! Audio decoding: any supported file to interleaved f32 PCM.

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Interleaved PCM as produced by the decoders.
///
/// `samples[frame * channels + channel]` holds one value in roughly [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub channels: u32,
    pub sample_rate: u32,
    pub frames: u64,
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    /// Wrap interleaved samples, checking the buffer length against the layout.
    pub fn new(channels: u32, sample_rate: u32, samples: Vec<f32>) -> Result<Self> {
        if channels == 0 {
            bail!("Decoded audio has no channels");
        }
        if samples.len() % channels as usize != 0 {
            bail!(
                "Interleaved buffer of {} samples is not a multiple of {} channels",
                samples.len(),
                channels
            );
        }
        let frames = (samples.len() / channels as usize) as u64;
        Ok(Self {
            channels,
            sample_rate,
            frames,
            samples,
        })
    }

    /// Duration in seconds, or in frames when the sample rate is unknown.
    pub fn duration_s(&self) -> f64 {
        if self.sample_rate == 0 {
            self.frames as f64
        } else {
            self.frames as f64 / self.sample_rate as f64
        }
    }
}

/// Decode a file, choosing the decoder from its extension.
///
/// WAV goes through hound; MP3, OGG Vorbis, FLAC and anything else symphonia
/// can probe go through symphonia.
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let decoded = match ext.as_deref() {
        Some("wav") => read_wav(path)?,
        _ => decode_with_symphonia(path)?,
    };

    log::info!(
        "Decoded {}: {} channels, {} frames at {} Hz ({:.2}s)",
        path.display(),
        decoded.channels,
        decoded.frames,
        decoded.sample_rate,
        decoded.duration_s()
    );
    Ok(decoded)
}

/// Read every channel of a WAV file as interleaved f32.
///
/// Integer formats are normalized to [-1, 1]; float WAVs pass through.
pub fn read_wav(path: &Path) -> Result<DecodedAudio> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("Failed to read WAV samples")?
        }
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read WAV samples")?,
    };

    DecodedAudio::new(spec.channels as u32, spec.sample_rate, samples)
}

/// Decode any container/codec symphonia supports, keeping all channels.
pub fn decode_with_symphonia(path: &Path) -> Result<DecodedAudio> {
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
    use symphonia::core::errors::Error as SymphError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unsupported format: {}", path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found")?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u32)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Unsupported codec")?;

    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                // Channel layout and rate of the decoded buffer win over the container.
                channels = spec.channels.count() as u32;
                sample_rate = spec.rate;

                let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(sample_buf.samples());
            }
            Err(SymphError::DecodeError(msg)) => {
                log::debug!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if interleaved.is_empty() {
        bail!("No audio decoded from {}", path.display());
    }

    DecodedAudio::new(channels, sample_rate, interleaved)
}
