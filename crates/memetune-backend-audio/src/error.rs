//! Error types for audio backend.

use std::fmt;

use memetune_spec::{BackendError, ConfigError};
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// An optional external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Text-to-speech engine used for vocals.
    Speech,
    /// Encoder producing a lossy container from WAV bytes.
    Transcoder,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Speech => f.write_str("text-to-speech"),
            Capability::Transcoder => f.write_str("lossy transcoder"),
        }
    }
}

/// Errors that can occur during audio generation.
#[derive(Debug, Error)]
pub enum AudioError {
    /// An optional collaborator is not installed or not configured.
    ///
    /// Callers are expected to degrade gracefully (omit the feature) rather
    /// than abort the whole request.
    #[error("{capability} unavailable: {reason}")]
    CapabilityUnavailable {
        /// The missing capability.
        capability: Capability,
        /// Why it is unavailable.
        reason: String,
    },

    /// Parameters failed validation before synthesis started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// WAV bytes could not be decoded.
    #[error("WAV decode error: {0}")]
    WavDecode(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal synthesis error.
    #[error("synthesis error: {message}")]
    Synthesis {
        /// Error message.
        message: String,
    },
}

impl AudioError {
    /// Creates a capability unavailable error.
    pub fn unavailable(capability: Capability, reason: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            capability,
            reason: reason.into(),
        }
    }

    /// Creates a synthesis error.
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }

    /// Returns true if this error only reports a missing optional capability.
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, AudioError::CapabilityUnavailable { .. })
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => AudioError::Io(io),
            other => AudioError::WavDecode(other.to_string()),
        }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::CapabilityUnavailable { .. } => "AUDIO_001",
            AudioError::InvalidConfig(_) => "AUDIO_002",
            AudioError::WavDecode(_) => "AUDIO_003",
            AudioError::Io(_) => "AUDIO_004",
            AudioError::Synthesis { .. } => "AUDIO_005",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_helper() {
        let err = AudioError::unavailable(Capability::Speech, "espeak-ng not found");
        assert!(err.is_capability_unavailable());
        assert!(err.to_string().contains("text-to-speech"));
        assert!(err.to_string().contains("espeak-ng not found"));
        assert_eq!(err.code(), "AUDIO_001");
    }

    #[test]
    fn test_synthesis_helper() {
        let err = AudioError::synthesis("resampler blew up");
        assert!(!err.is_capability_unavailable());
        assert!(err.to_string().contains("resampler blew up"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: AudioError = ConfigError::InvalidTempo { tempo: 0.0 }.into();
        assert_eq!(err.code(), "AUDIO_002");
        assert_eq!(err.category(), "audio");
    }
}
