//! Shared command-line options.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use memetune_backend_tools::{EspeakConfig, EspeakEngine, FfmpegConfig, FfmpegTranscoder};
use memetune_spec::{GenerationConfig, Genre, Limits, Seed};

use crate::facade::{GenerationMode, GenerationRequest, Generator};

/// Generation parameters. Flags override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Generation mode (instrumental, vocals, random)
    #[arg(short, long, default_value = "instrumental", value_parser = ["instrumental", "vocals", "lyrics", "random"])]
    pub mode: String,

    /// Prompt describing mood, instruments or motifs
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Lyrics to sing (vocals mode)
    #[arg(short, long)]
    pub lyrics: Option<String>,

    /// Genre (Electronic, Pop, Classical, Hip-Hop, Ambient, or any name)
    #[arg(short, long)]
    pub genre: Option<String>,

    /// Tempo in BPM
    #[arg(short, long)]
    pub tempo: Option<f64>,

    /// Duration in seconds
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Numeric seed
    #[arg(long, conflicts_with = "seed_text")]
    pub seed: Option<u32>,

    /// Seed text, hashed into a seed
    #[arg(long)]
    pub seed_text: Option<String>,

    /// Path to a JSON generation config
    #[arg(short, long)]
    pub config: Option<String>,
}

impl GenerationArgs {
    /// Loads the config file, if any, and applies flag overrides.
    pub fn to_config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path))?;
                GenerationConfig::from_json(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path))?
            }
            None => GenerationConfig::default(),
        };

        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
        if let Some(lyrics) = &self.lyrics {
            config.lyrics = lyrics.clone();
        }
        if let Some(genre) = &self.genre {
            config.genre = Genre::parse(genre);
        }
        if let Some(tempo) = self.tempo {
            config.tempo_bpm = tempo;
        }
        if let Some(duration) = self.duration {
            config.duration_seconds = duration;
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        if let Some(seed) = self.seed {
            config.seed = Seed::Value(seed);
        }
        if let Some(text) = &self.seed_text {
            config.seed = Seed::Text(text.clone());
        }

        Ok(config)
    }

    /// Builds the generation request.
    pub fn to_request(&self, want_lossy: bool) -> Result<GenerationRequest> {
        let mode: GenerationMode = self.mode.parse()?;
        Ok(GenerationRequest::new(mode, self.to_config()?).with_lossy(want_lossy))
    }
}

/// External tool options.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to espeak-ng or espeak (default: $MEMETUNE_ESPEAK, then PATH)
    #[arg(long)]
    pub espeak: Option<PathBuf>,

    /// espeak voice name
    #[arg(long)]
    pub voice: Option<String>,

    /// Path to ffmpeg (default: $MEMETUNE_FFMPEG, then PATH)
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,

    /// MP3 bitrate in kbit/s
    #[arg(long, default_value_t = memetune_backend_tools::DEFAULT_BITRATE_KBPS)]
    pub bitrate: u32,
}

impl ToolArgs {
    /// Locates the speech engine.
    pub fn speech_engine(&self) -> EspeakEngine {
        let mut config = EspeakConfig::default();
        if let Some(path) = &self.espeak {
            config = config.path(path);
        }
        if let Some(voice) = &self.voice {
            config = config.voice(voice);
        }
        EspeakEngine::with_config(config)
    }

    /// Locates the MP3 transcoder.
    pub fn transcoder(&self) -> FfmpegTranscoder {
        let mut config = FfmpegConfig::default().bitrate_kbps(self.bitrate);
        if let Some(path) = &self.ffmpeg {
            config = config.path(path);
        }
        FfmpegTranscoder::with_config(config)
    }

    /// Builds a generator with the located tools and default limits.
    pub fn generator(&self) -> Generator {
        Generator::new(Box::new(self.speech_engine()), Box::new(self.transcoder()))
            .with_limits(Limits::default())
    }
}
