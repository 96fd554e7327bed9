//! Core data types for the Vignette storyboard studio.
//!
//! This crate provides the data model shared by every other Vignette crate:
//! the story outline, storyboard panels and their status table, media helpers,
//! prompt templates and runtime configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod media;
mod panel;
mod prompts;
mod status;
mod story;
mod style;
mod video;

pub use config::{ApiConfig, ModelConfig, StudioSettings, StudioSettingsBuilder, VignetteConfig};
pub use media::{
    AspectRatio, PcmFormat, SILENT_WAV_DATA_URL, Voice, data_url, decode_data_url, encode_wav,
    wav_data_url,
};
pub use panel::Panel;
pub use prompts::{Language, PromptCategory, PromptStore, Prompts, render_template};
pub use status::PanelStatus;
pub use story::{NO_DESCRIPTION, Scene, StoryStructure};
pub use style::{STYLE_PRESETS, StylePreset};
pub use video::{
    GENERATION_MESSAGES, OperationError, ReferenceImage, VIDEO_SUCCESS_MESSAGE, VideoOperation,
    VideoRequest,
};
