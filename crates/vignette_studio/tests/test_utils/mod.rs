//! Test utilities for studio tests.
//!
//! This module provides mock backends and small fixtures.

#![allow(dead_code)]

pub mod mock_backend;
pub mod mock_music;

#[allow(unused_imports)]
pub use mock_backend::{MockCall, MockPoll, MockStudioBackend};
#[allow(unused_imports)]
pub use mock_music::{MockMusicConnector, MockSessionBehavior};

use std::sync::{Arc, RwLock};
use vignette_core::{Language, PromptStore, Scene, StoryStructure, StudioSettings};
use vignette_error::{StudioErrorKind, VignetteError, VignetteErrorKind};
use vignette_studio::{
    BoardSettings, PanelController, Services, SharedPrompts, Storyboard,
};

/// Three-scene outline.
pub fn sample_structure() -> StoryStructure {
    StoryStructure {
        title: "The Last Lamp".to_string(),
        logline: "A lamplighter keeps one street lit after the city goes dark.".to_string(),
        scenes: vec![
            Scene::new("Dusk", "The lamplighter climbs the first ladder."),
            Scene::new("Blackout", "Every window on the hill goes dark."),
            Scene::new("Dawn", "Children gather under the one lamp still burning."),
        ],
    }
}

/// Services backed entirely by `mock`.
pub fn services(mock: &Arc<MockStudioBackend>) -> Services {
    Services::from_client(Arc::clone(mock), mock.clone())
}

/// English prompt templates.
pub fn prompts() -> SharedPrompts {
    Arc::new(RwLock::new(PromptStore::new(Language::En)))
}

/// Board seeded from [`sample_structure`].
pub fn board() -> Storyboard {
    Storyboard::from_structure(&sample_structure(), BoardSettings::default())
}

/// Controller for `panel_id` on `board`.
pub fn controller(
    board: &Storyboard,
    panel_id: &str,
    mock: &Arc<MockStudioBackend>,
) -> anyhow::Result<PanelController> {
    Ok(PanelController::mount(
        board.clone(),
        panel_id,
        services(mock),
        prompts(),
        StudioSettings::default(),
    )?)
}

/// Studio kind of `err`, if it is a studio error.
pub fn studio_kind(err: &VignetteError) -> Option<&StudioErrorKind> {
    match err.kind() {
        VignetteErrorKind::Studio(e) => Some(e.kind()),
        _ => None,
    }
}

/// Music kind of `err`, if it is a music error.
pub fn music_kind(err: &VignetteError) -> Option<&vignette_error::MusicErrorKind> {
    match err.kind() {
        VignetteErrorKind::Music(e) => Some(e.kind()),
        _ => None,
    }
}
