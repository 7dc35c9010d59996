//! memetune generation config library
//!
//! This crate holds the types shared by every memetune crate: the
//! [`GenerationConfig`] that describes one generation request, the
//! [`Genre`] lookup, configuration validation, and the text-to-seed
//! derivation that makes generation reproducible from arbitrary text.
//!
//! # Example
//!
//! ```
//! use memetune_spec::{GenerationConfig, Genre, Seed};
//! use memetune_spec::seed::seed_from_text;
//!
//! let config = GenerationConfig::builder()
//!     .prompt("bright synth arpeggio")
//!     .genre(Genre::Electronic)
//!     .tempo_bpm(110.0)
//!     .duration_seconds(10.0)
//!     .seed(Seed::Text("hello world".to_string()))
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.resolved_seed(), seed_from_text("hello world"));
//! ```
//!
//! # Modules
//!
//! - [`config`]: Generation request type, builder and resource limits
//! - [`error`]: Configuration errors and the [`BackendError`] trait
//! - [`genre`]: Genre names and their base frequencies
//! - [`seed`]: Seed derivation from text

pub mod config;
pub mod error;
pub mod genre;
pub mod seed;

// Re-export commonly used types at the crate root
pub use config::{
    validate_timing, GenerationConfig, GenerationConfigBuilder, Limits,
    DEFAULT_DURATION_SECONDS, DEFAULT_LYRICS, DEFAULT_SAMPLE_RATE, DEFAULT_TEMPO_BPM,
};
pub use error::{BackendError, ConfigError, ConfigResult};
pub use genre::{Genre, DEFAULT_BASE_FREQUENCY};
pub use seed::{seed_from_text, Seed, MAX_SEED};
