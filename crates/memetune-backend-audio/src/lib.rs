//! memetune Audio Backend
//!
//! This crate turns generation parameters into audio:
//! - [`synth_melody`] - procedural instrumental melody from a seed
//! - [`synth_vocals`] - "sung" vocals from a text-to-speech engine
//! - [`wav`] - deterministic WAV encoding and decoding
//! - [`transcode_to_lossy`] - lossy encoding through an optional transcoder
//!
//! # Determinism
//!
//! Melody synthesis is deterministic. Given the same parameters and seed,
//! the output is bit-identical across runs (on the same platform). All
//! randomness comes from a per-call PCG32; nothing is shared between calls,
//! so syntheses may run concurrently.
//!
//! # Example
//!
//! ```
//! use memetune_backend_audio::{decode_wav, encode_wav, synth_melody};
//! use memetune_spec::{seed_from_text, Genre};
//!
//! let seed = seed_from_text("a happy dance anthem");
//! let wave = synth_melody("a happy dance anthem", 120.0, 1.0, &Genre::Pop, 22050, seed).unwrap();
//! let bytes = encode_wav(&wave);
//! assert_eq!(decode_wav(&bytes).unwrap(), wave);
//! ```
//!
//! # Crate Structure
//!
//! - [`melody`] - note composition and the render pipeline
//! - [`envelope`] - note and kick envelopes
//! - [`percussion`] - tempo-locked kick layer
//! - [`reverb`] - two-tap delay reverb
//! - [`filter`] - Butterworth lowpass and zero-phase filtering
//! - [`resample`] - FFT resampling
//! - [`vocals`] - speech downmix, vibrato and resampling
//! - [`capability`] - speech engine and transcoder traits
//! - [`rng`] - deterministic RNG

pub mod capability;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod melody;
pub mod normalize;
pub mod percussion;
pub mod resample;
pub mod reverb;
pub mod rng;
pub mod transcode;
pub mod vocals;
pub mod wav;
pub mod waveform;

// Re-export main types at crate root
pub use capability::{
    LossyFormat, LossyTranscoder, NoSpeech, NoTranscoder, RawSpeech, SpeechEngine,
};
pub use error::{AudioError, AudioResult, Capability};
pub use melody::{synth_melody, MelodySynth, Note};
pub use transcode::transcode_to_lossy;
pub use vocals::synth_vocals;
pub use wav::{decode_wav, encode_wav, encode_wav_pcm16, pcm_hash};
pub use waveform::Waveform;
