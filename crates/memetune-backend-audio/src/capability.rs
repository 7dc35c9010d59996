//! Optional external collaborators.
//!
//! Speech synthesis and lossy encoding are delegated to engines that may
//! not be installed. Each is modeled as a trait with an explicit
//! availability check, so call sites ask once instead of catching failures.
//! [`NoSpeech`] and [`NoTranscoder`] stand in when nothing is configured.

use crate::error::{AudioError, AudioResult, Capability};

/// Speech audio as produced by a TTS engine, at the engine's native rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpeech {
    /// One sample vector per channel, all of equal length.
    pub channels: Vec<Vec<f32>>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
}

impl RawSpeech {
    /// Creates single-channel speech.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    /// Splits interleaved frames into channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], num_channels: usize, sample_rate: u32) -> Self {
        let num_channels = num_channels.max(1);
        let frames = samples.len() / num_channels;
        let channels = (0..num_channels)
            .map(|c| (0..frames).map(|f| samples[f * num_channels + c]).collect())
            .collect();
        Self {
            channels,
            sample_rate,
        }
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }
}

/// A text-to-speech engine.
pub trait SpeechEngine: Send + Sync {
    /// Short engine name for diagnostics.
    fn name(&self) -> &str;

    /// Returns true if [`synthesize`](SpeechEngine::synthesize) can be called.
    fn is_available(&self) -> bool;

    /// Speaks `text`, returning audio at the engine's native rate.
    fn synthesize(&self, text: &str) -> AudioResult<RawSpeech>;
}

/// Container format produced by a [`LossyTranscoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LossyFormat {
    /// File extension without the dot.
    pub extension: &'static str,
    /// MIME type.
    pub mime: &'static str,
}

impl LossyFormat {
    /// MPEG-1 Layer III.
    pub const MP3: LossyFormat = LossyFormat {
        extension: "mp3",
        mime: "audio/mpeg",
    };
}

/// An encoder turning WAV bytes into a lossy container.
pub trait LossyTranscoder: Send + Sync {
    /// Short transcoder name for diagnostics.
    fn name(&self) -> &str;

    /// Output container format.
    fn format(&self) -> LossyFormat;

    /// Returns true if [`transcode`](LossyTranscoder::transcode) can be called.
    fn is_available(&self) -> bool;

    /// Encodes a complete WAV file.
    fn transcode(&self, wav_bytes: &[u8]) -> AudioResult<Vec<u8>>;
}

/// Speech engine that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

impl SpeechEngine for NoSpeech {
    fn name(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn synthesize(&self, _text: &str) -> AudioResult<RawSpeech> {
        Err(AudioError::unavailable(
            Capability::Speech,
            "no text-to-speech engine configured",
        ))
    }
}

/// Transcoder that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranscoder;

impl LossyTranscoder for NoTranscoder {
    fn name(&self) -> &str {
        "none"
    }

    fn format(&self) -> LossyFormat {
        LossyFormat::MP3
    }

    fn is_available(&self) -> bool {
        false
    }

    fn transcode(&self, _wav_bytes: &[u8]) -> AudioResult<Vec<u8>> {
        Err(AudioError::unavailable(
            Capability::Transcoder,
            "no lossy encoder configured",
        ))
    }
}
