//! Capability traits for generation backends.

use crate::{MusicConfig, WeightedPrompt};
use async_trait::async_trait;
use futures_util::stream::Stream;
use std::pin::Pin;
use vignette_core::{AspectRatio, StoryStructure, VideoOperation, VideoRequest, Voice};
use vignette_error::VignetteResult;

/// Lazy, finite stream of script fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = VignetteResult<String>> + Send>>;

/// Text requests: outline, script, image prompt and the writing assistant.
///
/// Every method takes the already-selected template; implementations
/// substitute the placeholders they own.
#[async_trait]
pub trait StoryWriter: Send + Sync {
    /// Turn an idea into a validated outline (`{{idea}}`).
    async fn generate_outline(&self, idea: &str, template: &str) -> VignetteResult<StoryStructure>;

    /// Stream a script for one scene (`{{sceneDescription}}`).
    async fn stream_script(
        &self,
        scene_description: &str,
        template: &str,
    ) -> VignetteResult<TextStream>;

    /// Condense a script into one image prompt (`{{script}}`, `{{globalStylePrompt}}`).
    async fn generate_image_prompt(
        &self,
        script: &str,
        style_prompt: &str,
        template: &str,
    ) -> VignetteResult<String>;

    /// Rewrite a scene description (`{{text}}`).
    async fn rewrite(&self, text: &str, template: &str) -> VignetteResult<String>;

    /// Lengthen a scene description (`{{text}}`).
    async fn expand(&self, text: &str, template: &str) -> VignetteResult<String>;

    /// Shorten a scene description (`{{text}}`).
    async fn shrink(&self, text: &str, template: &str) -> VignetteResult<String>;

    /// Rewrite with a different tone (`{{text}}`, `{{tone}}`).
    async fn change_tone(&self, text: &str, tone: &str, template: &str)
    -> VignetteResult<String>;
}

/// Still image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Render one image, returned as a `data:` URL.
    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio)
    -> VignetteResult<String>;
}

/// Long-running video generation.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Submit a job and return its handle.
    async fn start_video_generation(
        &self,
        prompt: &str,
        request: &VideoRequest,
    ) -> VignetteResult<VideoOperation>;

    /// Fetch the latest state of a job.
    async fn check_video_status(&self, operation: &VideoOperation)
    -> VignetteResult<VideoOperation>;

    /// Attach the access credential to a finished video URI.
    fn authorize_video_uri(&self, uri: &str) -> String;
}

/// Narration.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` (`{{text}}`) with a prebuilt voice, returned as a WAV `data:` URL.
    async fn generate_speech(&self, text: &str, voice: Voice, template: &str)
    -> VignetteResult<String>;
}

/// Request/response music generation for a single panel.
#[async_trait]
pub trait MusicGenerator: Send + Sync {
    /// Produce a track for `prompt` (`{{prompt}}`), returned as a WAV `data:` URL.
    async fn generate_music(&self, prompt: &str, template: &str) -> VignetteResult<String>;
}

/// An open real-time music session.
///
/// Audio arrives in the background while the session is playing; every chunk
/// received since connecting is retained until drained.
#[async_trait]
pub trait MusicSession: Send {
    /// Replace the steering prompts.
    async fn set_weighted_prompts(&mut self, prompts: &[WeightedPrompt]) -> VignetteResult<()>;

    /// Update generation parameters.
    async fn set_music_config(&mut self, config: &MusicConfig) -> VignetteResult<()>;

    /// Start or resume playback.
    async fn play(&mut self) -> VignetteResult<()>;

    /// Suspend playback without closing.
    async fn pause(&mut self) -> VignetteResult<()>;

    /// Stop playback.
    async fn stop(&mut self) -> VignetteResult<()>;

    /// Take every raw PCM chunk buffered so far, in arrival order.
    fn drain_audio(&mut self) -> Vec<Vec<u8>>;

    /// Close the connection.
    async fn close(&mut self) -> VignetteResult<()>;
}

/// Opens real-time music sessions.
#[async_trait]
pub trait MusicConnector: Send + Sync {
    /// Connect and complete the setup handshake.
    async fn connect(&self) -> VignetteResult<Box<dyn MusicSession>>;
}
