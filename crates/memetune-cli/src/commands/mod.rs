//! CLI command implementations

pub mod doctor;
pub mod generate;
pub mod options;
pub mod preview;
pub mod seed;

use std::process::ExitCode;

use memetune_spec::BackendError;
use serde::Serialize;

use crate::facade::FacadeError;

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CONFIG_001", "AUDIO_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Builds a JSON error from a facade error.
    pub fn from_facade(err: &FacadeError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Exit code for a failed request: 1 for bad input, 2 for generation
/// failures.
pub fn failure_code(err: &FacadeError) -> ExitCode {
    match err {
        FacadeError::Audio(_) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}
