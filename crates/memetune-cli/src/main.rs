//! memetune CLI - Procedural meme song generation
//!
//! This binary generates instrumentals and sung vocals from prompts and
//! lyrics.

mod cli_args;

use std::process::ExitCode;

use clap::Parser;
use cli_args::{Cli, Commands};
use memetune_cli::commands;

/// Log level for a `-v` count.
fn log_level(verbose: u8) -> log::Level {
    match verbose {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = simple_logger::init_with_level(log_level(cli.verbose)) {
        eprintln!("{}: failed to initialize logging: {}", colored::Colorize::yellow("warning"), e);
    }

    let result = match cli.command {
        Commands::Generate {
            args,
            tools,
            out,
            mp3,
            json,
        } => commands::generate::run(&args, &tools, out.as_deref(), mp3, json),
        Commands::Preview {
            args,
            tools,
            preview_seconds,
            out,
        } => commands::preview::run(&args, &tools, preview_seconds, &out),
        Commands::Seed { text, json } => commands::seed::run(&text, json),
        Commands::Doctor { tools } => commands::doctor::run(&tools),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
