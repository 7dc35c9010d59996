//! Error types for configuration validation and backend reporting.

use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised when a generation config cannot be used.
///
/// These are raised before any synthesis starts, so a rejected config never
/// produces NaN or garbage audio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Tempo is zero, negative or not finite.
    #[error("invalid tempo: {tempo} BPM (must be a positive finite number)")]
    InvalidTempo {
        /// The rejected tempo.
        tempo: f64,
    },

    /// Duration is zero, negative or not finite.
    #[error("invalid duration: {duration} seconds (must be a positive finite number)")]
    InvalidDuration {
        /// The rejected duration.
        duration: f64,
    },

    /// Sample rate is zero.
    #[error("invalid sample rate: {rate} Hz (must be positive)")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: u32,
    },

    /// A value is valid but larger than the configured limit.
    #[error("{name} of {value} exceeds the limit of {max}")]
    LimitExceeded {
        /// Name of the limited field.
        name: &'static str,
        /// The requested value.
        value: f64,
        /// The configured maximum.
        max: f64,
    },

    /// The config document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Creates a limit exceeded error.
    pub fn limit(name: &'static str, value: f64, max: f64) -> Self {
        Self::LimitExceeded { name, value, max }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Trait for backend-specific errors.
///
/// All backend error types implement this so that callers can report a
/// stable code and category regardless of which backend failed.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "AUDIO_001" or "TOOLS_002". These codes
    /// are stable and can be used for programmatic error handling.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    ///
    /// Returns a category like "config", "audio" or "tools".
    fn category(&self) -> &'static str;
}

impl BackendError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidTempo { .. } => "CONFIG_001",
            ConfigError::InvalidDuration { .. } => "CONFIG_002",
            ConfigError::InvalidSampleRate { .. } => "CONFIG_003",
            ConfigError::LimitExceeded { .. } => "CONFIG_004",
            ConfigError::Parse(_) => "CONFIG_005",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_value() {
        let err = ConfigError::InvalidTempo { tempo: -4.0 };
        assert!(err.to_string().contains("-4"));

        let err = ConfigError::limit("duration_seconds", 900.0, 600.0);
        assert!(err.to_string().contains("duration_seconds"));
        assert!(err.to_string().contains("600"));
    }

    #[test]
    fn test_backend_error_codes() {
        assert_eq!(ConfigError::InvalidSampleRate { rate: 0 }.code(), "CONFIG_003");
        assert_eq!(ConfigError::Parse("x".into()).category(), "config");
    }
}
