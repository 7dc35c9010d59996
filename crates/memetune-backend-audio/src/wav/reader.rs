//! WAV decoding.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};

use crate::capability::RawSpeech;
use crate::error::{AudioError, AudioResult};
use crate::waveform::Waveform;

/// Decodes a WAV file into a mono waveform.
///
/// Multi-channel input is averaged down to one channel.
pub fn decode_wav(bytes: &[u8]) -> AudioResult<Waveform> {
    let RawSpeech {
        mut channels,
        sample_rate,
    } = decode_channels(bytes)?;
    let samples = if channels.len() == 1 {
        channels.remove(0)
    } else {
        let count = channels.len() as f32;
        let frames = channels.first().map(Vec::len).unwrap_or(0);
        (0..frames)
            .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() / count)
            .collect()
    };
    Ok(Waveform::new(samples, sample_rate))
}

/// Decodes a WAV file into per-channel samples at the file's rate.
///
/// Integer PCM is scaled to [-1.0, 1.0) by its bit depth. A trailing
/// partial frame is dropped.
pub fn decode_channels(bytes: &[u8]) -> AudioResult<RawSpeech> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::WavDecode("file declares 0 channels".to_string()));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    Ok(RawSpeech::from_interleaved(
        &interleaved,
        spec.channels as usize,
        spec.sample_rate,
    ))
}

/// Returns the payload of the first `data` chunk, or `None` if `wav` is not
/// a RIFF/WAVE file or the chunk is truncated.
pub fn data_chunk(wav: &[u8]) -> Option<&[u8]> {
    if wav.len() < 12 || &wav[0..4] != b"RIFF" || &wav[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav.len() {
        let id = &wav[pos..pos + 4];
        let size = u32::from_le_bytes([wav[pos + 4], wav[pos + 5], wav[pos + 6], wav[pos + 7]])
            as usize;
        let start = pos + 8;
        if id == b"data" {
            return wav.get(start..start.checked_add(size)?);
        }
        // Chunks are word aligned
        pos = start + size + (size & 1);
    }

    None
}
