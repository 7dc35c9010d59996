//! Generation request type and validation.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::genre::Genre;
use crate::seed::Seed;

/// Default tempo in beats per minute.
pub const DEFAULT_TEMPO_BPM: f64 = 100.0;

/// Default duration in seconds.
pub const DEFAULT_DURATION_SECONDS: f64 = 15.0;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Lyrics used when a request does not bring its own.
pub const DEFAULT_LYRICS: &str = "La la la";

/// One generation request.
///
/// The prompt is carried for the caller's benefit and for cache keys; it
/// does not influence the synthesized content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Free-text description of the desired mood.
    pub prompt: String,
    /// Lyrics for vocal generation.
    pub lyrics: String,
    /// Tempo in beats per minute.
    pub tempo_bpm: f64,
    /// Duration in seconds.
    pub duration_seconds: f64,
    /// Genre, selects the base frequency.
    pub genre: Genre,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Numeric seed or seed text.
    pub seed: Seed,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            lyrics: DEFAULT_LYRICS.to_string(),
            tempo_bpm: DEFAULT_TEMPO_BPM,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            genre: Genre::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            seed: Seed::default(),
        }
    }
}

impl GenerationConfig {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the config to pretty JSON.
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the numeric seed.
    pub fn resolved_seed(&self) -> u32 {
        self.seed.resolve()
    }

    /// Checks the invariants every synthesizer relies on.
    ///
    /// Tempo and duration must be positive and finite (tempo is a divisor),
    /// and the sample rate must be positive.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_timing(self.tempo_bpm, self.duration_seconds, self.sample_rate)
    }

    /// Validates and additionally enforces resource limits.
    pub fn validate_with_limits(&self, limits: &Limits) -> ConfigResult<()> {
        self.validate()?;
        limits.check(self.tempo_bpm, self.duration_seconds, self.sample_rate)
    }
}

/// Validates raw timing parameters.
///
/// Shared by [`GenerationConfig::validate`] and backend entry points that
/// take the parameters individually.
pub fn validate_timing(tempo_bpm: f64, duration_seconds: f64, sample_rate: u32) -> ConfigResult<()> {
    if !(tempo_bpm.is_finite() && tempo_bpm > 0.0) {
        return Err(ConfigError::InvalidTempo { tempo: tempo_bpm });
    }
    if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
        return Err(ConfigError::InvalidDuration {
            duration: duration_seconds,
        });
    }
    if sample_rate == 0 {
        return Err(ConfigError::InvalidSampleRate { rate: sample_rate });
    }
    Ok(())
}

/// Resource limits applied by front ends before generation.
///
/// Generation has no cancellation contract, so bounding the inputs is how a
/// caller bounds the work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum duration in seconds.
    pub max_duration_seconds: f64,
    /// Maximum sample rate in Hz.
    pub max_sample_rate: u32,
    /// Maximum tempo in beats per minute.
    pub max_tempo_bpm: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_duration_seconds: Self::DEFAULT_MAX_DURATION_SECONDS,
            max_sample_rate: Self::DEFAULT_MAX_SAMPLE_RATE,
            max_tempo_bpm: Self::DEFAULT_MAX_TEMPO_BPM,
        }
    }
}

impl Limits {
    /// Default maximum duration in seconds.
    pub const DEFAULT_MAX_DURATION_SECONDS: f64 = 600.0;

    /// Default maximum sample rate in Hz.
    pub const DEFAULT_MAX_SAMPLE_RATE: u32 = 192_000;

    /// Default maximum tempo in BPM.
    pub const DEFAULT_MAX_TEMPO_BPM: f64 = 1000.0;

    fn check(&self, tempo_bpm: f64, duration_seconds: f64, sample_rate: u32) -> ConfigResult<()> {
        if tempo_bpm > self.max_tempo_bpm {
            return Err(ConfigError::limit("tempo_bpm", tempo_bpm, self.max_tempo_bpm));
        }
        if duration_seconds > self.max_duration_seconds {
            return Err(ConfigError::limit(
                "duration_seconds",
                duration_seconds,
                self.max_duration_seconds,
            ));
        }
        if sample_rate > self.max_sample_rate {
            return Err(ConfigError::limit(
                "sample_rate",
                sample_rate as f64,
                self.max_sample_rate as f64,
            ));
        }
        Ok(())
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug, Clone, Default)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    /// Sets the prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    /// Sets the lyrics.
    pub fn lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.config.lyrics = lyrics.into();
        self
    }

    /// Sets the tempo in BPM.
    pub fn tempo_bpm(mut self, tempo_bpm: f64) -> Self {
        self.config.tempo_bpm = tempo_bpm;
        self
    }

    /// Sets the duration in seconds.
    pub fn duration_seconds(mut self, duration_seconds: f64) -> Self {
        self.config.duration_seconds = duration_seconds;
        self
    }

    /// Sets the genre.
    pub fn genre(mut self, genre: Genre) -> Self {
        self.config.genre = genre;
        self
    }

    /// Sets the sample rate in Hz.
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, seed: impl Into<Seed>) -> Self {
        self.config.seed = seed.into();
        self
    }

    /// Builds the config. Validation is left to the caller.
    pub fn build(self) -> GenerationConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_rate, 22050);
        assert_eq!(config.tempo_bpm, 100.0);
    }

    #[test]
    fn test_rejects_non_positive_tempo() {
        let config = GenerationConfig::builder().tempo_bpm(0.0).build();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTempo { tempo: 0.0 })
        );
        let config = GenerationConfig::builder().tempo_bpm(f64::NAN).build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTempo { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let config = GenerationConfig::builder().duration_seconds(-1.0).build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration { .. })
        ));
        let config = GenerationConfig::builder()
            .duration_seconds(f64::INFINITY)
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let config = GenerationConfig::builder().sample_rate(0).build();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSampleRate { rate: 0 })
        );
    }

    #[test]
    fn test_limits() {
        let limits = Limits::default();
        let config = GenerationConfig::builder().duration_seconds(601.0).build();
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.validate_with_limits(&limits),
            Err(ConfigError::LimitExceeded {
                name: "duration_seconds",
                ..
            })
        ));

        let config = GenerationConfig::builder().sample_rate(384_000).build();
        assert!(config.validate_with_limits(&limits).is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GenerationConfig::from_json(
            r#"{ "genre": "Hip-Hop", "tempo_bpm": 90, "seed": "late night" }"#,
        )
        .unwrap();
        assert_eq!(config.genre, Genre::HipHop);
        assert_eq!(config.tempo_bpm, 90.0);
        assert_eq!(config.duration_seconds, DEFAULT_DURATION_SECONDS);
        assert_eq!(config.seed, Seed::Text("late night".into()));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = GenerationConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = GenerationConfig::builder()
            .prompt("rainy day")
            .genre(Genre::Ambient)
            .seed(9u32)
            .build();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(GenerationConfig::from_json(&json).unwrap(), config);
    }
}
