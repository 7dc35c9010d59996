//! Generate command implementation
//!
//! Generates a full-length track and writes it as WAV (and optionally MP3).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use memetune_backend_audio::pcm_hash;
use serde::Serialize;

use super::options::{GenerationArgs, ToolArgs};
use super::{failure_code, JsonError};
use crate::facade::{GeneratedAudio, GenerationNote, GenerationRequest, Generator};

/// Machine-readable result of `generate --json`.
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    /// Whether generation succeeded
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Successful generation details.
#[derive(Debug, Serialize)]
pub struct GenerateResult {
    pub mode: String,
    pub seed: u32,
    pub sample_rate: u32,
    pub num_samples: usize,
    pub duration_seconds: f64,
    pub wav_path: String,
    /// BLAKE3 hash of the sample payload
    pub pcm_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lossy_path: Option<String>,
    pub notes: Vec<GenerationNote>,
    pub duration_ms: u64,
}

/// Run the generate command
///
/// # Arguments
/// * `args` - Generation parameters
/// * `tools` - External tool options
/// * `out` - Output WAV path (default: `<mode>.wav`)
/// * `mp3` - Also write an MP3 next to the WAV
/// * `json_output` - Print machine-readable JSON instead of colored text
///
/// # Returns
/// Exit code: 0 success, 1 invalid input, 2 generation error
pub fn run(
    args: &GenerationArgs,
    tools: &ToolArgs,
    out: Option<&str>,
    mp3: bool,
    json_output: bool,
) -> Result<ExitCode> {
    let request = args.to_request(mp3)?;
    let generator = tools.generator();
    run_with(&generator, &request, out, json_output)
}

/// Runs a request against a prepared generator.
pub fn run_with(
    generator: &Generator,
    request: &GenerationRequest,
    out: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let start = Instant::now();
    let wav_path = out
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}.wav", request.mode.file_stem())));

    if !json_output {
        println!(
            "{} {} ({}, {} BPM, {} s)",
            "Generating".cyan().bold(),
            request.mode,
            request.config.genre,
            request.config.tempo_bpm,
            request.config.duration_seconds
        );
    }

    let audio = match generator.generate(request) {
        Ok(audio) => audio,
        Err(err) => {
            if json_output {
                print_json(&GenerateOutput {
                    ok: false,
                    result: None,
                    error: Some(JsonError::from_facade(&err)),
                })?;
            } else {
                eprintln!("{} {}", "FAILED".red().bold(), err);
            }
            return Ok(failure_code(&err));
        }
    };

    let lossy_path = write_outputs(&audio, &wav_path)?;
    let elapsed = start.elapsed().as_millis() as u64;

    if json_output {
        print_json(&GenerateOutput {
            ok: true,
            result: Some(GenerateResult {
                mode: request.mode.to_string(),
                seed: audio.seed,
                sample_rate: audio.waveform.sample_rate(),
                num_samples: audio.waveform.len(),
                duration_seconds: audio.waveform.duration_seconds(),
                wav_path: wav_path.display().to_string(),
                pcm_hash: pcm_hash(&audio.waveform),
                lossy_path: lossy_path.map(|p| p.display().to_string()),
                notes: audio.notes,
                duration_ms: elapsed,
            }),
            error: None,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("  {} {}", "->".green(), wav_path.display());
    if let Some(path) = &lossy_path {
        println!("  {} {}", "->".green(), path.display());
    }
    for note in &audio.notes {
        println!("  {} {}", "!!".yellow(), note);
    }
    println!(
        "{} seed {}, {} samples at {} Hz in {}ms",
        "SUCCESS".green().bold(),
        audio.seed,
        audio.waveform.len(),
        audio.waveform.sample_rate(),
        elapsed
    );

    Ok(ExitCode::SUCCESS)
}

/// Writes the WAV and, if present, the lossy file next to it.
fn write_outputs(audio: &GeneratedAudio, wav_path: &Path) -> Result<Option<PathBuf>> {
    if let Some(parent) = wav_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(wav_path, &audio.wav)
        .with_context(|| format!("Failed to write WAV file: {}", wav_path.display()))?;

    match &audio.lossy {
        Some(lossy) => {
            let path = wav_path.with_extension(lossy.format.extension);
            fs::write(&path, &lossy.bytes)
                .with_context(|| format!("Failed to write {} file: {}", lossy.format.extension, path.display()))?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}
