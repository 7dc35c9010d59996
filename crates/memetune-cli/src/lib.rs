//! memetune CLI library.
//!
//! This crate provides the generation facade used by the `memetune` binary:
//! request handling, optional capability wiring, preview caching, and the
//! command implementations.

pub mod cache;
pub mod commands;
pub mod facade;

pub use cache::{PreviewCache, PreviewKey};
pub use facade::{
    FacadeError, GeneratedAudio, GenerationMode, GenerationNote, GenerationRequest, Generator,
    LossyAudio,
};
