//! Generation backends injected into controllers.

use std::sync::{Arc, PoisonError, RwLock};
use vignette_core::{PromptCategory, PromptStore};
use vignette_interface::{
    ImageGenerator, MusicGenerator, SpeechSynthesizer, StoryWriter, VideoGenerator,
};

/// Prompt templates shared by every component of a session.
pub type SharedPrompts = Arc<RwLock<PromptStore>>;

/// Copy of the active template for `category`.
pub(crate) fn template(prompts: &SharedPrompts, category: PromptCategory) -> String {
    prompts
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .prompt(category)
        .to_string()
}

/// Every backend a storyboard session talks to.
///
/// # Examples
///
/// ```ignore
/// let services = Services::builder()
///     .writer(client.clone())
///     .images(client.clone())
///     .video(client.clone())
///     .speech(client)
///     .music(Arc::new(SimulatedMusicGenerator::default()))
///     .build()?;
/// ```
#[derive(Clone, derive_getters::Getters, derive_builder::Builder)]
pub struct Services {
    /// Outline, script, image prompt and writing assistant
    writer: Arc<dyn StoryWriter>,
    /// Still images
    images: Arc<dyn ImageGenerator>,
    /// Video jobs
    video: Arc<dyn VideoGenerator>,
    /// Narration
    speech: Arc<dyn SpeechSynthesizer>,
    /// Per-panel soundtracks
    music: Arc<dyn MusicGenerator>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

impl Services {
    /// Creates a new builder.
    pub fn builder() -> ServicesBuilder {
        ServicesBuilder::default()
    }

    /// Use one client for every request/response capability.
    pub fn from_client<C>(client: Arc<C>, music: Arc<dyn MusicGenerator>) -> Self
    where
        C: StoryWriter + ImageGenerator + VideoGenerator + SpeechSynthesizer + 'static,
    {
        Self {
            writer: client.clone(),
            images: client.clone(),
            video: client.clone(),
            speech: client,
            music,
        }
    }
}
