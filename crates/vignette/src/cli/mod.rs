//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the vignette binary.

mod commands;
mod music;
mod outline;
mod produce;
mod prompts;

pub use commands::{Cli, Commands, MusicArgs, ProduceArgs, StoryboardArgs};
pub use music::record_music;
pub use outline::{generate_outline, new_session};
pub use produce::{produce, storyboard};
pub use prompts::print_prompts;
