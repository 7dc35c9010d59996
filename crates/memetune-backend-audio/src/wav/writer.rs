//! WAV encoding.

use std::io::{self, Write};

use super::format::WavFormat;
use crate::waveform::Waveform;

/// Encodes a waveform as mono 32-bit float WAV.
///
/// Decoding the result with [`decode_wav`](super::decode_wav) returns the
/// exact same samples and rate.
pub fn encode_wav(waveform: &Waveform) -> Vec<u8> {
    let payload = float32_payload(waveform.samples());
    assemble(&WavFormat::float32(waveform.sample_rate()), &payload, waveform.len())
}

/// Encodes a waveform as mono 16-bit PCM WAV. Samples are clipped to [-1, 1].
pub fn encode_wav_pcm16(waveform: &Waveform) -> Vec<u8> {
    let payload = samples_to_pcm16(waveform.samples());
    assemble(&WavFormat::pcm16(waveform.sample_rate()), &payload, waveform.len())
}

/// Writes [`encode_wav`] output to a writer.
pub fn write_wav<W: Write>(writer: &mut W, waveform: &Waveform) -> io::Result<()> {
    writer.write_all(&encode_wav(waveform))
}

/// BLAKE3 hex digest of the float sample payload of [`encode_wav`].
pub fn pcm_hash(waveform: &Waveform) -> String {
    blake3::hash(&float32_payload(waveform.samples()))
        .to_hex()
        .to_string()
}

/// Converts samples to little-endian 16-bit PCM bytes.
///
/// Values outside [-1.0, 1.0] are clipped.
pub fn samples_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clipped = sample.clamp(-1.0, 1.0) as f64;
        let value = (clipped * 32767.0).round() as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
    }
    pcm
}

fn float32_payload(samples: &[f32]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(samples.len() * 4);
    for &sample in samples {
        payload.extend_from_slice(&sample.to_le_bytes());
    }
    payload
}

/// Lays out RIFF header, fmt chunk, optional fact chunk and data chunk.
fn assemble(format: &WavFormat, payload: &[u8], frames: usize) -> Vec<u8> {
    let data_size = payload.len() as u32;
    let fmt_size: u32 = if format.is_extended() { 18 } else { 16 };
    let fact_size: u32 = if format.is_extended() { 8 + 4 } else { 0 };
    // Everything after the 8-byte RIFF header
    let riff_size = 4 + (8 + fmt_size) + fact_size + 8 + data_size;

    let mut out = Vec::with_capacity(8 + riff_size as usize);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&fmt_size.to_le_bytes());
    out.extend_from_slice(&format.encoding.format_tag().to_le_bytes());
    out.extend_from_slice(&format.channels().to_le_bytes());
    out.extend_from_slice(&format.sample_rate.to_le_bytes());
    out.extend_from_slice(&format.byte_rate().to_le_bytes());
    out.extend_from_slice(&format.block_align().to_le_bytes());
    out.extend_from_slice(&format.encoding.bits_per_sample().to_le_bytes());

    if format.is_extended() {
        // cbSize
        out.extend_from_slice(&0u16.to_le_bytes());

        out.extend_from_slice(b"fact");
        out.extend_from_slice(&4u32.to_le_bytes());
        out.extend_from_slice(&(frames as u32).to_le_bytes());
    }

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(payload);

    out
}
