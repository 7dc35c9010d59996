//! CLI argument definitions for the memetune command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgAction, Parser, Subcommand};
use memetune_cli::commands::options::{GenerationArgs, ToolArgs};

/// memetune - Procedural meme songs from prompts and lyrics
#[derive(Parser)]
#[command(name = "memetune")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate a full-length track
    Generate {
        #[command(flatten)]
        args: GenerationArgs,

        #[command(flatten)]
        tools: ToolArgs,

        /// Output WAV path (default: <mode>.wav)
        #[arg(short, long)]
        out: Option<String>,

        /// Also write an MP3 next to the WAV (requires ffmpeg)
        #[arg(long)]
        mp3: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Generate a short preview WAV
    Preview {
        #[command(flatten)]
        args: GenerationArgs,

        #[command(flatten)]
        tools: ToolArgs,

        /// Preview length in seconds
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(3..=10))]
        preview_seconds: u32,

        /// Output WAV path
        #[arg(short, long, default_value = "preview.wav")]
        out: String,
    },

    /// Print the seed derived from text; blank text maps to the fallback seed 0
    Seed {
        /// Seed text, hashed unless blank
        text: String,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Check optional external tools
    Doctor {
        #[command(flatten)]
        tools: ToolArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "memetune",
            "generate",
            "--mode",
            "vocals",
            "--lyrics",
            "never gonna give you up",
            "--tempo",
            "120",
            "--seed-text",
            "rick",
            "--mp3",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate {
                args, mp3, json, out, ..
            } => {
                assert_eq!(args.mode, "vocals");
                assert_eq!(args.lyrics.as_deref(), Some("never gonna give you up"));
                assert_eq!(args.tempo, Some(120.0));
                assert_eq!(args.seed_text.as_deref(), Some("rick"));
                assert!(mp3);
                assert!(!json);
                assert!(out.is_none());
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_rejects_seed_and_seed_text() {
        let result = Cli::try_parse_from([
            "memetune",
            "generate",
            "--seed",
            "1",
            "--seed-text",
            "x",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["memetune", "generate", "--mode", "karaoke"]).is_err());
    }

    #[test]
    fn test_cli_preview_length_range() {
        let cli = Cli::try_parse_from(["memetune", "preview"]).unwrap();
        match cli.command {
            Commands::Preview {
                preview_seconds,
                out,
                ..
            } => {
                assert_eq!(preview_seconds, 5);
                assert_eq!(out, "preview.wav");
            }
            _ => panic!("expected preview command"),
        }
        assert!(Cli::try_parse_from(["memetune", "preview", "--preview-seconds", "2"]).is_err());
        assert!(Cli::try_parse_from(["memetune", "preview", "--preview-seconds", "11"]).is_err());
    }

    #[test]
    fn test_cli_parses_seed() {
        let cli = Cli::try_parse_from(["memetune", "seed", "hello world", "--json"]).unwrap();
        match cli.command {
            Commands::Seed { text, json } => {
                assert_eq!(text, "hello world");
                assert!(json);
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_seed_help_mentions_blank_fallback() {
        let cmd = Cli::command();
        let seed = cmd.find_subcommand("seed").unwrap();
        let about = seed.get_about().unwrap().to_string();
        assert!(about.contains("blank text maps to the fallback seed 0"));
    }
}
