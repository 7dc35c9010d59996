//! Preview command implementation
//!
//! Writes a short WAV preview of the requested audio.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use super::options::{GenerationArgs, ToolArgs};
use crate::facade::{GenerationRequest, Generator};

/// Run the preview command
///
/// # Arguments
/// * `args` - Generation parameters (duration is ignored)
/// * `tools` - External tool options
/// * `preview_seconds` - Preview length in seconds
/// * `out` - Output WAV path
///
/// # Returns
/// Exit code: 0 success, 1 invalid input, 2 generation error
pub fn run(
    args: &GenerationArgs,
    tools: &ToolArgs,
    preview_seconds: u32,
    out: &str,
) -> Result<ExitCode> {
    let request = args.to_request(false)?;
    run_with(&tools.generator(), &request, preview_seconds as f64, out)
}

/// Runs a preview against a prepared generator.
pub fn run_with(
    generator: &Generator,
    request: &GenerationRequest,
    preview_seconds: f64,
    out: &str,
) -> Result<ExitCode> {
    println!(
        "{} {} ({} s)",
        "Preview:".cyan().bold(),
        request.mode,
        preview_seconds
    );

    let bytes = match generator.preview(request, preview_seconds) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!(
                "{} Preview generation failed: {}",
                "FAILED".red().bold(),
                err
            );
            return Ok(super::failure_code(&err));
        }
    };

    fs::write(out, bytes.as_slice())
        .with_context(|| format!("Failed to write preview file: {}", out))?;
    println!("  {} {} ({} bytes)", "->".green(), out, bytes.len());

    Ok(ExitCode::SUCCESS)
}
