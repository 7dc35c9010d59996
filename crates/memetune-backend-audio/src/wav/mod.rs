//! Deterministic WAV codec.
//!
//! Waveforms are written as mono IEEE float WAV with no timestamps or
//! variable metadata, so identical waveforms always encode to identical
//! bytes and decoding gives back the exact samples. A 16-bit PCM variant
//! exists for consumers that cannot read float WAV. Decoding goes through
//! `hound` and accepts any float or integer PCM file.

mod format;
mod reader;
mod writer;


pub use format::{SampleEncoding, WavFormat};
pub use reader::{data_chunk, decode_channels, decode_wav};
pub use writer::{encode_wav, encode_wav_pcm16, pcm_hash, samples_to_pcm16, write_wav};
