//! Seed command implementation
//!
//! Prints the seed derived from a piece of text.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use memetune_spec::Seed;

/// Run the seed command
///
/// Blank text resolves to the fallback seed, matching what generation does
/// with a blank `--seed-text`.
pub fn run(text: &str, json_output: bool) -> Result<ExitCode> {
    let seed = derive(text);
    if json_output {
        println!("{}", serde_json::json!({ "text": text, "seed": seed }));
    } else {
        println!("{} {}", "seed".bold(), seed.to_string().green());
    }
    Ok(ExitCode::SUCCESS)
}

/// The seed generation would use for `text`.
pub fn derive(text: &str) -> u32 {
    Seed::Text(text.to_string()).resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use memetune_spec::{seed_from_text, MAX_SEED};

    #[test]
    fn test_derive() {
        assert_eq!(derive("hello"), seed_from_text("hello"));
        assert!(derive("hello") < MAX_SEED);
        assert_eq!(derive("  "), 0);
        assert_eq!(derive(""), Seed::FALLBACK);
    }
}
