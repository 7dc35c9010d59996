//! MP3 encoding through the `ffmpeg` command line.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use memetune_backend_audio::{AudioResult, Capability, LossyFormat, LossyTranscoder};

use crate::error::{ToolError, ToolResult};
use crate::locate::{find_tool, ToolLookup};
use crate::process::{run_piped, DEFAULT_TIMEOUT_SECS};

/// Environment variable overriding the ffmpeg executable.
pub const FFMPEG_ENV_VAR: &str = "MEMETUNE_FFMPEG";

/// Default MP3 bitrate in kbit/s.
pub const DEFAULT_BITRATE_KBPS: u32 = 128;

const LOOKUP: ToolLookup = ToolLookup {
    env_var: FFMPEG_ENV_VAR,
    names: &["ffmpeg"],
    common_paths: &[
        "/usr/bin/ffmpeg",
        "/usr/local/bin/ffmpeg",
        "/opt/homebrew/bin/ffmpeg",
    ],
};

/// Configuration for [`FfmpegTranscoder`].
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// Path to the executable.
    pub path: Option<PathBuf>,
    /// MP3 bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// Timeout for one encode.
    pub timeout: Duration,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            path: None,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FfmpegConfig {
    /// Sets the executable path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the bitrate.
    pub fn bitrate_kbps(mut self, kbps: u32) -> Self {
        self.bitrate_kbps = kbps;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// MP3 transcoder backed by an ffmpeg subprocess.
///
/// WAV bytes go in through stdin and MP3 bytes come back on stdout; no
/// temporary files are involved.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    config: FfmpegConfig,
    executable: Option<PathBuf>,
}

impl FfmpegTranscoder {
    /// Creates a transcoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(FfmpegConfig::default())
    }

    /// Creates a transcoder with the given configuration.
    pub fn with_config(config: FfmpegConfig) -> Self {
        let executable = find_tool(config.path.as_deref(), &LOOKUP);
        match &executable {
            Some(path) => log::debug!("ffmpeg found at {}", path.display()),
            None => log::debug!("ffmpeg not found"),
        }
        Self { config, executable }
    }

    /// Path of the located executable.
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    fn command(&self) -> ToolResult<Command> {
        let path = self.executable.as_ref().ok_or(ToolError::NotFound {
            tool: "ffmpeg",
            env_var: FFMPEG_ENV_VAR,
        })?;

        // ffmpeg -f wav -i pipe:0 -codec:a libmp3lame -b:a <n>k -f mp3 pipe:1
        let mut cmd = Command::new(path);
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"])
            .args(["-f", "wav", "-i", "pipe:0"])
            .args(["-vn", "-codec:a", "libmp3lame"])
            .arg("-b:a")
            .arg(format!("{}k", self.config.bitrate_kbps))
            .args(["-f", "mp3", "pipe:1"]);
        Ok(cmd)
    }

    /// Encodes WAV bytes to MP3.
    pub fn encode(&self, wav_bytes: &[u8]) -> ToolResult<Vec<u8>> {
        let cmd = self.command()?;
        run_piped("ffmpeg", cmd, wav_bytes.to_vec(), self.config.timeout)
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LossyTranscoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn format(&self) -> LossyFormat {
        LossyFormat::MP3
    }

    fn is_available(&self) -> bool {
        self.executable.is_some()
    }

    fn transcode(&self, wav_bytes: &[u8]) -> AudioResult<Vec<u8>> {
        self.encode(wav_bytes)
            .map_err(|err| err.into_audio_error(Capability::Transcoder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = FfmpegConfig::default()
            .path("/usr/bin/ffmpeg")
            .bitrate_kbps(192)
            .timeout_secs(10);
        assert_eq!(config.path, Some(PathBuf::from("/usr/bin/ffmpeg")));
        assert_eq!(config.bitrate_kbps, 192);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_command_line() {
        let transcoder = FfmpegTranscoder {
            config: FfmpegConfig::default().bitrate_kbps(96),
            executable: Some(PathBuf::from("/usr/bin/ffmpeg")),
        };
        let cmd = transcoder.command().unwrap();
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.windows(2).any(|w| w == ["-b:a", "96k"]));
        assert!(args.windows(2).any(|w| w == ["-codec:a", "libmp3lame"]));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn test_missing_executable_is_unavailable() {
        let transcoder = FfmpegTranscoder {
            config: FfmpegConfig::default(),
            executable: None,
        };
        assert!(!transcoder.is_available());
        let err = transcoder.transcode(b"RIFF").unwrap_err();
        assert!(err.is_capability_unavailable());
    }
}
