//! Generation facade.
//!
//! [`Generator`] owns the optional collaborators (speech engine, lossy
//! transcoder) and the preview cache, and turns a [`GenerationRequest`] into
//! encoded audio. It is `Send + Sync`; one generator can serve concurrent
//! callers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use memetune_backend_audio::{
    encode_wav, encode_wav_pcm16, synth_melody, synth_vocals, transcode_to_lossy, AudioError,
    LossyFormat, LossyTranscoder, NoSpeech, NoTranscoder, SpeechEngine, Waveform,
};
use memetune_spec::{BackendError, ConfigError, GenerationConfig, Limits};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{PreviewCache, PreviewKey};

/// Prompt used by [`GenerationMode::Random`].
pub const RANDOM_PROMPT: &str = "random";

/// Default preview length in seconds.
pub const DEFAULT_PREVIEW_SECONDS: f64 = 5.0;

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Melody from the prompt and seed.
    #[default]
    Instrumental,
    /// Sung vocals from the lyrics.
    Vocals,
    /// Melody with the fixed prompt "random".
    Random,
}

impl GenerationMode {
    /// Returns the string identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Instrumental => "instrumental",
            GenerationMode::Vocals => "vocals",
            GenerationMode::Random => "random",
        }
    }

    /// Suggested output file stem.
    pub fn file_stem(&self) -> &'static str {
        self.as_str()
    }

    /// Returns true for modes rendered by the melody synthesizer.
    pub fn is_melodic(&self) -> bool {
        !matches!(self, GenerationMode::Vocals)
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = FacadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instrumental" => Ok(GenerationMode::Instrumental),
            "vocals" | "lyrics" => Ok(GenerationMode::Vocals),
            "random" => Ok(GenerationMode::Random),
            _ => Err(FacadeError::UnknownMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// One generation request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationRequest {
    /// What to generate.
    pub mode: GenerationMode,
    /// Generation parameters.
    pub config: GenerationConfig,
    /// Also produce lossy bytes when a transcoder is available.
    pub want_lossy: bool,
}

impl GenerationRequest {
    /// Creates a request without lossy output.
    pub fn new(mode: GenerationMode, config: GenerationConfig) -> Self {
        Self {
            mode,
            config,
            want_lossy: false,
        }
    }

    /// Requests lossy output.
    pub fn with_lossy(mut self, want_lossy: bool) -> Self {
        self.want_lossy = want_lossy;
        self
    }

    /// Prompt handed to the synthesizer.
    pub fn effective_prompt(&self) -> &str {
        match self.mode {
            GenerationMode::Random => RANDOM_PROMPT,
            _ => &self.config.prompt,
        }
    }
}

/// Errors from the facade.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// Parameters failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Vocals were requested without lyrics.
    #[error("Please provide lyrics")]
    EmptyLyrics,

    /// Preview length is not positive and finite.
    #[error("invalid preview length: {seconds}")]
    InvalidPreviewLength { seconds: f64 },

    /// Mode name not recognized.
    #[error("unknown mode '{mode}'. Expected one of: instrumental, vocals, random")]
    UnknownMode { mode: String },

    /// Synthesis failed.
    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl BackendError for FacadeError {
    fn code(&self) -> &'static str {
        match self {
            FacadeError::Config(err) => err.code(),
            FacadeError::EmptyLyrics => "FACADE_001",
            FacadeError::InvalidPreviewLength { .. } => "FACADE_002",
            FacadeError::UnknownMode { .. } => "FACADE_003",
            FacadeError::Audio(err) => err.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            FacadeError::Config(err) => err.category(),
            FacadeError::Audio(err) => err.category(),
            _ => "facade",
        }
    }
}

/// Something the caller should know about a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationNote {
    /// Lossy output was requested but could not be produced.
    LossyUnavailable { reason: String },
}

impl fmt::Display for GenerationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationNote::LossyUnavailable { reason } => {
                write!(f, "lossy export unavailable: {}", reason)
            }
        }
    }
}

/// Lossy encoded audio.
#[derive(Debug, Clone, PartialEq)]
pub struct LossyAudio {
    /// Container format.
    pub format: LossyFormat,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

/// Result of [`Generator::generate`].
#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    /// The synthesized waveform.
    pub waveform: Waveform,
    /// Float WAV encoding of the waveform.
    pub wav: Vec<u8>,
    /// Lossy encoding, when requested and available.
    pub lossy: Option<LossyAudio>,
    /// Seed the audio was generated from.
    pub seed: u32,
    /// Degradations that did not fail the request.
    pub notes: Vec<GenerationNote>,
}

/// Generates audio with injected collaborators.
pub struct Generator {
    speech: Box<dyn SpeechEngine>,
    transcoder: Box<dyn LossyTranscoder>,
    cache: PreviewCache,
    limits: Option<Limits>,
}

impl Generator {
    /// Creates a generator from a speech engine and a transcoder.
    pub fn new(speech: Box<dyn SpeechEngine>, transcoder: Box<dyn LossyTranscoder>) -> Self {
        Self {
            speech,
            transcoder,
            cache: PreviewCache::default(),
            limits: None,
        }
    }

    /// Creates a generator with no speech engine and no transcoder.
    pub fn offline() -> Self {
        Self::new(Box::new(NoSpeech), Box::new(NoTranscoder))
    }

    /// Enforces resource limits on every request.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Replaces the preview cache.
    pub fn with_cache(mut self, cache: PreviewCache) -> Self {
        self.cache = cache;
        self
    }

    /// The speech engine.
    pub fn speech(&self) -> &dyn SpeechEngine {
        self.speech.as_ref()
    }

    /// The lossy transcoder.
    pub fn transcoder(&self) -> &dyn LossyTranscoder {
        self.transcoder.as_ref()
    }

    /// The preview cache.
    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    fn validate(&self, config: &GenerationConfig) -> Result<(), FacadeError> {
        match &self.limits {
            Some(limits) => config.validate_with_limits(limits)?,
            None => config.validate()?,
        }
        Ok(())
    }

    /// Synthesizes the waveform for `request`, with the melody lasting
    /// `duration_seconds`.
    fn synthesize(
        &self,
        request: &GenerationRequest,
        duration_seconds: f64,
    ) -> Result<Waveform, FacadeError> {
        let config = &request.config;
        let wave = match request.mode {
            GenerationMode::Instrumental | GenerationMode::Random => synth_melody(
                request.effective_prompt(),
                config.tempo_bpm,
                duration_seconds,
                &config.genre,
                config.sample_rate,
                config.resolved_seed(),
            )?,
            GenerationMode::Vocals => {
                if config.lyrics.trim().is_empty() {
                    return Err(FacadeError::EmptyLyrics);
                }
                synth_vocals(self.speech.as_ref(), &config.lyrics, config.sample_rate)?
            }
        };
        Ok(wave)
    }

    /// Generates full-length audio.
    ///
    /// WAV bytes are always produced. When lossy output is requested but the
    /// transcoder is unavailable or fails, the result carries a
    /// [`GenerationNote::LossyUnavailable`] instead of an error.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAudio, FacadeError> {
        self.validate(&request.config)?;
        let waveform = self.synthesize(request, request.config.duration_seconds)?;
        let wav = encode_wav(&waveform);
        log::info!(
            "generated {} audio: {} samples at {} Hz ({:.2} s)",
            request.mode,
            waveform.len(),
            waveform.sample_rate(),
            waveform.duration_seconds()
        );

        let mut notes = Vec::new();
        let lossy = if request.want_lossy {
            // Encoders are fed 16-bit PCM, which every decoder accepts
            match transcode_to_lossy(self.transcoder.as_ref(), &encode_wav_pcm16(&waveform)) {
                Ok(bytes) => Some(LossyAudio {
                    format: self.transcoder.format(),
                    bytes,
                }),
                Err(err) => {
                    log::warn!("lossy export skipped: {}", err);
                    notes.push(GenerationNote::LossyUnavailable {
                        reason: err.to_string(),
                    });
                    None
                }
            }
        } else {
            None
        };

        Ok(GeneratedAudio {
            waveform,
            wav,
            lossy,
            seed: request.config.resolved_seed(),
            notes,
        })
    }

    /// Builds the cache key for a preview.
    pub fn preview_key(&self, request: &GenerationRequest, preview_seconds: f64) -> PreviewKey {
        let config = &request.config;
        let melodic = request.mode.is_melodic();
        PreviewKey {
            mode: request.mode.as_str().to_string(),
            prompt: melodic.then(|| request.effective_prompt().to_string()),
            lyrics: (!melodic).then(|| config.lyrics.clone()),
            tempo_bpm: config.tempo_bpm,
            genre: config.genre.to_string(),
            sample_rate: config.sample_rate,
            seed: config.resolved_seed(),
            preview_seconds,
        }
    }

    /// Generates a short preview as WAV bytes, memoized per parameter set.
    ///
    /// Melodic modes synthesize `preview_seconds` of audio; vocals are
    /// synthesized in full and cut to `round(preview_seconds * rate)`
    /// samples. The configured duration is ignored.
    pub fn preview(
        &self,
        request: &GenerationRequest,
        preview_seconds: f64,
    ) -> Result<Arc<Vec<u8>>, FacadeError> {
        if !(preview_seconds.is_finite() && preview_seconds > 0.0) {
            return Err(FacadeError::InvalidPreviewLength {
                seconds: preview_seconds,
            });
        }
        let mut config = request.config.clone();
        config.duration_seconds = preview_seconds;
        self.validate(&config)?;

        let key = self.preview_key(request, preview_seconds);
        self.cache.get_or_try_insert(&key, || {
            let wave = self.synthesize(request, preview_seconds)?;
            let wave = if request.mode.is_melodic() {
                wave
            } else {
                let max = (preview_seconds * wave.sample_rate() as f64).round() as usize;
                wave.truncated(max)
            };
            log::info!("preview: {} samples at {} Hz", wave.len(), wave.sample_rate());
            Ok(encode_wav(&wave))
        })
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::offline()
    }
}
