//! Error types for the external tool backends.

use memetune_backend_audio::{AudioError, Capability};
use memetune_spec::BackendError;
use thiserror::Error;

/// Result type for tool backend operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Executable not found.
    #[error("{tool} executable not found. Ensure it is installed and in PATH, or set the {env_var} environment variable")]
    NotFound {
        tool: &'static str,
        env_var: &'static str,
    },

    /// Failed to spawn the process.
    #[error("Failed to spawn {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Process timed out.
    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout { tool: String, timeout_secs: u64 },

    /// Process exited with non-zero status.
    #[error("{tool} exited with status {exit_code}: {stderr}")]
    ProcessFailed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    /// Process succeeded but wrote nothing.
    #[error("{tool} produced no output")]
    EmptyOutput { tool: String },

    /// Process output could not be interpreted.
    #[error("{tool} produced invalid output: {message}")]
    InvalidOutput { tool: String, message: String },

    /// IO error while talking to the process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Creates a new process failed error.
    pub fn process_failed(tool: impl Into<String>, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            tool: tool.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new invalid output error.
    pub fn invalid_output(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Converts to the audio backend's error at a capability trait boundary.
    ///
    /// A missing executable means the capability is unavailable; every other
    /// failure is a synthesis error.
    pub fn into_audio_error(self, capability: Capability) -> AudioError {
        match self {
            ToolError::NotFound { .. } => AudioError::unavailable(capability, self.to_string()),
            other => AudioError::synthesis(other.to_string()),
        }
    }
}

impl BackendError for ToolError {
    fn code(&self) -> &'static str {
        match self {
            ToolError::NotFound { .. } => "TOOLS_001",
            ToolError::SpawnFailed { .. } => "TOOLS_002",
            ToolError::Timeout { .. } => "TOOLS_003",
            ToolError::ProcessFailed { .. } => "TOOLS_004",
            ToolError::EmptyOutput { .. } => "TOOLS_005",
            ToolError::InvalidOutput { .. } => "TOOLS_006",
            ToolError::Io(_) => "TOOLS_007",
        }
    }

    fn category(&self) -> &'static str {
        "tools"
    }
}
