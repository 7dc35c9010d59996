//! memetune External Tool Backends
//!
//! Implementations of the audio backend's optional capabilities on top of
//! command-line tools:
//! - [`EspeakEngine`] - [`SpeechEngine`](memetune_backend_audio::SpeechEngine)
//!   using `espeak-ng` or `espeak`
//! - [`FfmpegTranscoder`] - [`LossyTranscoder`](memetune_backend_audio::LossyTranscoder)
//!   producing MP3 with `ffmpeg`
//!
//! Executables are located from an explicit path, then an environment
//! variable (`MEMETUNE_ESPEAK`, `MEMETUNE_FFMPEG`), then `PATH`. A tool
//! that cannot be found makes its capability report itself unavailable
//! instead of failing.

pub mod error;
pub mod espeak;
pub mod ffmpeg;
pub mod locate;
pub mod process;

pub use error::{ToolError, ToolResult};
pub use espeak::{EspeakConfig, EspeakEngine, ESPEAK_ENV_VAR};
pub use ffmpeg::{FfmpegConfig, FfmpegTranscoder, DEFAULT_BITRATE_KBPS, FFMPEG_ENV_VAR};
