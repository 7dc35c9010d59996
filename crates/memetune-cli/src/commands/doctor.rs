//! Doctor command implementation
//!
//! Reports which optional external tools are available.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use memetune_backend_audio::{LossyTranscoder, SpeechEngine};
use memetune_backend_tools::{ESPEAK_ENV_VAR, FFMPEG_ENV_VAR};

use super::options::ToolArgs;

/// Run the doctor command
///
/// Missing tools only disable vocals or MP3 export, so they are reported
/// as warnings and never fail the command.
pub fn run(tools: &ToolArgs) -> Result<ExitCode> {
    println!("{}", "memetune Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    println!("{}", "Versions:".bold());
    println!(
        "  {} memetune-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Capabilities:".bold());
    println!("  {} instrumental synthesis (built in)", "ok".green());

    let speech = tools.speech_engine();
    match speech.executable() {
        Some(path) => println!(
            "  {} vocals via {} ({})",
            "ok".green(),
            speech.name(),
            path.display()
        ),
        None => {
            println!("  {} vocals: espeak-ng not found", "!!".yellow());
            println!(
                "     {}",
                format!(
                    "Install espeak-ng, put it in PATH, or set {}.",
                    ESPEAK_ENV_VAR
                )
                .dimmed()
            );
        }
    }

    let transcoder = tools.transcoder();
    match transcoder.executable() {
        Some(path) => println!(
            "  {} {} export via {} ({})",
            "ok".green(),
            transcoder.format().extension,
            transcoder.name(),
            path.display()
        ),
        None => {
            println!("  {} MP3 export: ffmpeg not found", "!!".yellow());
            println!(
                "     {}",
                format!("Install ffmpeg, put it in PATH, or set {}.", FFMPEG_ENV_VAR).dimmed()
            );
        }
    }

    println!();
    if speech.is_available() && transcoder.is_available() {
        println!("{} All capabilities available!", "SUCCESS".green().bold());
    } else {
        println!(
            "{} Some optional capabilities are missing. See above for details.",
            "WARNING".yellow().bold()
        );
    }
    Ok(ExitCode::SUCCESS)
}
