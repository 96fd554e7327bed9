//! Storyboard studio for Vignette.
//!
//! This crate turns the generation backends into a working storyboard:
//! - [`StudioSession`] - the idea → outline → storyboard → production wizard
//! - [`StructureEditor`] - outline editing with the writing assistant
//! - [`Storyboard`] - shared panel record with change events
//! - [`PanelController`] - per-panel pipeline and side operations
//! - [`VideoTask`] - background video polling with progress messages
//! - [`MusicSessionManager`] - live music play/pause/stop lifecycle

#![forbid(unsafe_code)]

mod board;
mod controller;
mod editor;
mod music;
mod services;
mod session;
mod video;

pub use board::{BoardSettings, Operation, PanelEvent, Storyboard};
pub use controller::{
    AUDIO_FAILED, GENERATION_FAILED, IMAGE_FAILED, MUSIC_FAILED, OperationOutcome,
    PanelController,
};
pub use editor::{AssistAction, StructureEditor};
pub use music::{MusicSessionManager, SessionState};
pub use services::{Services, ServicesBuilder, SharedPrompts};
pub use session::{STRUCTURE_FAILED, StudioSession, StudioStep};
pub use video::{VIDEO_FAILED, VIDEO_MISSING, VideoTask};
