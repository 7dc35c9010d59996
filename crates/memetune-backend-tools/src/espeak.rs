//! Text-to-speech through the `espeak-ng` / `espeak` command line.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use memetune_backend_audio::wav::decode_channels;
use memetune_backend_audio::{AudioResult, Capability, RawSpeech, SpeechEngine};

use crate::error::{ToolError, ToolResult};
use crate::locate::{find_tool, ToolLookup};
use crate::process::{run_piped, DEFAULT_TIMEOUT_SECS};

/// Environment variable overriding the espeak executable.
pub const ESPEAK_ENV_VAR: &str = "MEMETUNE_ESPEAK";

const LOOKUP: ToolLookup = ToolLookup {
    env_var: ESPEAK_ENV_VAR,
    names: &["espeak-ng", "espeak"],
    common_paths: &[
        "/usr/bin/espeak-ng",
        "/usr/local/bin/espeak-ng",
        "/opt/homebrew/bin/espeak-ng",
        "/usr/bin/espeak",
    ],
};

/// Configuration for [`EspeakEngine`].
#[derive(Debug, Clone)]
pub struct EspeakConfig {
    /// Path to the executable.
    pub path: Option<PathBuf>,
    /// Voice name passed as `-v`.
    pub voice: Option<String>,
    /// Speaking rate in words per minute, passed as `-s`.
    pub words_per_minute: Option<u32>,
    /// Timeout for one synthesis.
    pub timeout: Duration,
}

impl Default for EspeakConfig {
    fn default() -> Self {
        Self {
            path: None,
            voice: None,
            words_per_minute: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EspeakConfig {
    /// Sets the executable path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the voice.
    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    /// Sets the speaking rate.
    pub fn words_per_minute(mut self, wpm: u32) -> Self {
        self.words_per_minute = Some(wpm);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Speech engine backed by an espeak subprocess.
///
/// The executable is located once at construction. Every call spawns its
/// own process, so the engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    config: EspeakConfig,
    executable: Option<PathBuf>,
}

impl EspeakEngine {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EspeakConfig::default())
    }

    /// Creates an engine with the given configuration.
    pub fn with_config(config: EspeakConfig) -> Self {
        let executable = find_tool(config.path.as_deref(), &LOOKUP);
        match &executable {
            Some(path) => log::debug!("espeak found at {}", path.display()),
            None => log::debug!("espeak not found"),
        }
        Self { config, executable }
    }

    /// Path of the located executable.
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    fn command(&self) -> ToolResult<Command> {
        let path = self.executable.as_ref().ok_or(ToolError::NotFound {
            tool: "espeak-ng",
            env_var: ESPEAK_ENV_VAR,
        })?;

        // espeak-ng --stdout --stdin [-v voice] [-s wpm]
        let mut cmd = Command::new(path);
        cmd.arg("--stdout").arg("--stdin");
        if let Some(voice) = &self.config.voice {
            cmd.arg("-v").arg(voice);
        }
        if let Some(wpm) = self.config.words_per_minute {
            cmd.arg("-s").arg(wpm.to_string());
        }
        Ok(cmd)
    }

    /// Runs espeak and decodes its WAV output.
    pub fn speak(&self, text: &str) -> ToolResult<RawSpeech> {
        let cmd = self.command()?;
        let mut wav = run_piped(self.name(), cmd, text.as_bytes().to_vec(), self.config.timeout)?;
        repair_streamed_wav(&mut wav);

        decode_channels(&wav).map_err(|err| ToolError::invalid_output(self.name(), err.to_string()))
    }
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &str {
        self.executable
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
            .unwrap_or("espeak-ng")
    }

    fn is_available(&self) -> bool {
        self.executable.is_some()
    }

    fn synthesize(&self, text: &str) -> AudioResult<RawSpeech> {
        self.speak(text)
            .map_err(|err| err.into_audio_error(Capability::Speech))
    }
}

/// Rewrites RIFF and data chunk sizes to match the bytes actually present.
///
/// When writing to a pipe espeak cannot seek back to fill in the sizes and
/// leaves placeholders that overrun the real data.
pub fn repair_streamed_wav(wav: &mut [u8]) {
    if wav.len() < 12 || &wav[0..4] != b"RIFF" || &wav[8..12] != b"WAVE" {
        return;
    }
    let riff_size = (wav.len() - 8) as u32;
    wav[4..8].copy_from_slice(&riff_size.to_le_bytes());

    let mut pos = 12;
    while pos + 8 <= wav.len() {
        let size = u32::from_le_bytes([wav[pos + 4], wav[pos + 5], wav[pos + 6], wav[pos + 7]])
            as usize;
        let start = pos + 8;
        if &wav[pos..pos + 4] == b"data" {
            let available = wav.len() - start;
            if size > available {
                wav[pos + 4..pos + 8].copy_from_slice(&(available as u32).to_le_bytes());
            }
            return;
        }
        pos = start.saturating_add(size).saturating_add(size & 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memetune_backend_audio::{encode_wav_pcm16, Waveform};

    #[test]
    fn test_config_builder() {
        let config = EspeakConfig::default()
            .path("/usr/bin/espeak-ng")
            .voice("en-us")
            .words_per_minute(140)
            .timeout_secs(5);
        assert_eq!(config.path, Some(PathBuf::from("/usr/bin/espeak-ng")));
        assert_eq!(config.voice.as_deref(), Some("en-us"));
        assert_eq!(config.words_per_minute, Some(140));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_repair_streamed_wav() {
        let wave = Waveform::new(vec![0.5, -0.5, 0.25], 22050);
        let good = encode_wav_pcm16(&wave);

        let mut streamed = good.clone();
        streamed[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
        streamed[40..44].copy_from_slice(&0x7fff_f000u32.to_le_bytes());

        repair_streamed_wav(&mut streamed);
        assert_eq!(streamed, good);
    }

    #[test]
    fn test_repair_leaves_other_bytes_alone() {
        let mut junk = b"not a wav at all".to_vec();
        let before = junk.clone();
        repair_streamed_wav(&mut junk);
        assert_eq!(junk, before);
    }

    #[test]
    fn test_missing_executable_is_unavailable() {
        let engine = EspeakEngine {
            config: EspeakConfig::default(),
            executable: None,
        };
        assert!(!engine.is_available());
        assert_eq!(engine.name(), "espeak-ng");
        let err = engine.synthesize("hello").unwrap_err();
        assert!(err.is_capability_unavailable());
    }
}
