//! Trait definitions for the Vignette generation backends.
//!
//! This crate provides one capability trait per kind of generation request,
//! plus the live music session traits. The storyboard studio depends only on
//! these traits, so any backend (or a test double) can drive it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{
    ImageGenerator, MusicConnector, MusicGenerator, MusicSession, SpeechSynthesizer, StoryWriter,
    TextStream, VideoGenerator,
};
pub use types::{MusicConfig, MusicConfigBuilder, WeightedPrompt};
