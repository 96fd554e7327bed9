//! Per-panel generation pipeline.
//!
//! A [`PanelController`] drives one storyboard panel through its stages:
//!
//! ```text
//! pending → scripting → prompting → imaging → complete
//!                 ↘          ↘          ↘
//!                              error
//! complete/error → imaging | tts-generating | video-generating | music-generating → complete/error
//! ```
//!
//! Side operations overlap freely, but none may start while
//! [`run_generation`](PanelController::run_generation) owns the panel.
//!
//! Remote failures never surface as `Err`; they land on the panel as
//! `status = error` plus a fixed message, and the operation reports
//! [`OperationOutcome::Failed`]. `Err` is reserved for requests the board
//! rejects outright (unknown panel, busy, unmounted, invalid transition).

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use vignette_core::{Panel, PanelStatus, PromptCategory, StudioSettings, VideoRequest, Voice};
use vignette_error::{StudioError, StudioErrorKind, VignetteResult};

use crate::board::{BoardSettings, Operation, Storyboard};
use crate::services::{Services, SharedPrompts, template};
use crate::video::VideoTask;

/// Shown when the script, image prompt or image request fails.
pub const GENERATION_FAILED: &str = "An error occurred during generation.";
/// Shown when regenerating an image fails.
pub const IMAGE_FAILED: &str = "Failed to regenerate image.";
/// Shown when narration fails.
pub const AUDIO_FAILED: &str = "Failed to generate audio.";
/// Shown when the soundtrack fails.
pub const MUSIC_FAILED: &str = "Failed to generate music.";

/// How an operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The panel reached `complete`
    Completed,
    /// The panel was moved to `error` with this message
    Failed(String),
    /// Blank input; nothing was requested
    Skipped,
    /// The panel was unmounted or the task cancelled; results were discarded
    Dropped,
}

/// Handle driving one panel of a [`Storyboard`].
///
/// Cloning yields another handle on the same mount: unmounting any clone
/// unmounts them all.
#[derive(Debug, Clone)]
pub struct PanelController {
    panel_id: String,
    board: Storyboard,
    services: Services,
    prompts: SharedPrompts,
    settings: StudioSettings,
    alive: CancellationToken,
}

impl PanelController {
    /// Mount a controller on an existing panel.
    pub fn mount(
        board: Storyboard,
        panel_id: impl Into<String>,
        services: Services,
        prompts: SharedPrompts,
        settings: StudioSettings,
    ) -> Result<Self, StudioError> {
        let panel_id = panel_id.into();
        if board.panel(&panel_id).is_none() {
            return Err(StudioError::new(StudioErrorKind::PanelNotFound(panel_id)));
        }
        debug!(panel_id = %panel_id, "Panel mounted");
        Ok(Self {
            panel_id,
            board,
            services,
            prompts,
            settings,
            alive: CancellationToken::new(),
        })
    }

    /// Id of the driven panel.
    pub fn panel_id(&self) -> &str {
        &self.panel_id
    }

    /// Current snapshot of the driven panel.
    pub fn panel(&self) -> Option<Panel> {
        self.board.panel(&self.panel_id)
    }

    /// Whether [`unmount`](Self::unmount) has been called.
    pub fn is_unmounted(&self) -> bool {
        self.alive.is_cancelled()
    }

    /// Stop writing to the panel. Timers stop; in-flight results are discarded.
    pub fn unmount(&self) {
        info!(panel_id = %self.panel_id, "Panel unmounted");
        self.alive.cancel();
    }

    pub(crate) fn services(&self) -> &Services {
        &self.services
    }

    pub(crate) fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    pub(crate) fn template(&self, category: PromptCategory) -> String {
        template(&self.prompts, category)
    }

    fn ensure_mounted(&self) -> Result<(), StudioError> {
        if self.is_unmounted() {
            return Err(StudioError::new(StudioErrorKind::Unmounted(
                self.panel_id.clone(),
            )));
        }
        Ok(())
    }

    /// Reject a side operation while the main pipeline runs on this panel.
    fn ensure_not_generating(&self, next: PanelStatus) -> Result<(), StudioError> {
        if !self.board.is_busy(&self.panel_id, Operation::Generation) {
            return Ok(());
        }
        let from = self
            .panel()
            .map(|panel| panel.status.to_string())
            .unwrap_or_default();
        Err(StudioError::new(StudioErrorKind::InvalidTransition {
            panel: self.panel_id.clone(),
            from,
            to: next.to_string(),
        }))
    }

    /// Apply `change` unless `token` is cancelled. Returns `false` when dropped.
    pub(crate) fn apply<F>(&self, token: &CancellationToken, change: F) -> Result<bool, StudioError>
    where
        F: FnOnce(&mut Panel) -> Result<(), StudioError>,
    {
        if token.is_cancelled() {
            debug!(panel_id = %self.panel_id, "Dropping update after cancellation");
            return Ok(false);
        }
        self.board.update(&self.panel_id, change)?;
        Ok(true)
    }

    /// Move the panel to `error` with `message`.
    pub(crate) fn fail(
        &self,
        token: &CancellationToken,
        message: &str,
    ) -> Result<OperationOutcome, StudioError> {
        if self.apply(token, |panel| panel.fail(message))? {
            Ok(OperationOutcome::Failed(message.to_string()))
        } else {
            Ok(OperationOutcome::Dropped)
        }
    }

    /// Script, image prompt and image, in order. Only valid while `pending`.
    #[instrument(skip(self), fields(panel_id = %self.panel_id))]
    pub async fn run_generation(&self) -> VignetteResult<OperationOutcome> {
        self.ensure_mounted()?;
        let _busy = self.board.acquire(&self.panel_id, Operation::Generation)?;

        let panel = self
            .panel()
            .ok_or_else(|| StudioError::new(StudioErrorKind::PanelNotFound(self.panel_id.clone())))?;

        if !self.apply(&self.alive, |panel| {
            panel.transition(PanelStatus::Scripting)?;
            panel.error_message = None;
            Ok(())
        })? {
            return Ok(OperationOutcome::Dropped);
        }

        let settings = self.board.settings();
        match self
            .generation_stages(&panel.scene_description, &settings)
            .await
        {
            Ok(true) => {
                info!("Panel complete");
                Ok(OperationOutcome::Completed)
            }
            Ok(false) => Ok(OperationOutcome::Dropped),
            Err(e) => {
                error!(error = %e, "Panel generation failed");
                Ok(self.fail(&self.alive, GENERATION_FAILED)?)
            }
        }
    }

    async fn generation_stages(
        &self,
        scene_description: &str,
        settings: &BoardSettings,
    ) -> VignetteResult<bool> {
        let token = &self.alive;

        let mut stream = self
            .services
            .writer()
            .stream_script(scene_description, &self.template(PromptCategory::Script))
            .await?;

        let mut script = String::new();
        while let Some(fragment) = stream.next().await {
            script.push_str(&fragment?);
            let partial = script.clone();
            if !self.apply(token, |panel| {
                panel.script = Some(partial);
                Ok(())
            })? {
                return Ok(false);
            }
        }
        debug!(chars = script.len(), "Script complete");

        let full = script.clone();
        if !self.apply(token, |panel| {
            panel.script = Some(full.clone());
            panel.tts_script = Some(full);
            Ok(())
        })? {
            return Ok(false);
        }

        if !self.apply(token, |panel| panel.transition(PanelStatus::Prompting))? {
            return Ok(false);
        }
        let image_prompt = self
            .services
            .writer()
            .generate_image_prompt(
                &script,
                &settings.style_prompt,
                &self.template(PromptCategory::ImagePrompt),
            )
            .await?;
        let stored = image_prompt.clone();
        if !self.apply(token, |panel| {
            panel.image_prompt = Some(stored);
            Ok(())
        })? {
            return Ok(false);
        }

        if !self.apply(token, |panel| panel.transition(PanelStatus::Imaging))? {
            return Ok(false);
        }
        let image_url = self
            .services
            .images()
            .generate_image(&image_prompt, settings.aspect_ratio)
            .await?;

        self.apply(token, |panel| {
            panel.transition(PanelStatus::Complete)?;
            panel.image_url = Some(image_url);
            Ok(())
        })
        .map_err(Into::into)
    }

    /// Render a new image from an edited prompt.
    #[instrument(skip(self, prompt), fields(panel_id = %self.panel_id))]
    pub async fn regenerate_image(&self, prompt: &str) -> VignetteResult<OperationOutcome> {
        if prompt.trim().is_empty() {
            return Ok(OperationOutcome::Skipped);
        }
        self.ensure_mounted()?;
        self.ensure_not_generating(PanelStatus::Imaging)?;
        let _busy = self.board.acquire(&self.panel_id, Operation::Image)?;

        if !self.apply(&self.alive, |panel| {
            panel.transition(PanelStatus::Imaging)?;
            panel.error_message = None;
            Ok(())
        })? {
            return Ok(OperationOutcome::Dropped);
        }

        let aspect_ratio = self.board.settings().aspect_ratio;
        match self
            .services
            .images()
            .generate_image(prompt, aspect_ratio)
            .await
        {
            Ok(image_url) => self.finish(|panel| {
                panel.image_url = Some(image_url);
            }),
            Err(e) => {
                warn!(error = %e, "Image regeneration failed");
                Ok(self.fail(&self.alive, IMAGE_FAILED)?)
            }
        }
    }

    /// Narrate `text` with `voice`.
    #[instrument(skip(self, text), fields(panel_id = %self.panel_id, voice = %voice))]
    pub async fn generate_audio(&self, text: &str, voice: Voice) -> VignetteResult<OperationOutcome> {
        if text.trim().is_empty() {
            return Ok(OperationOutcome::Skipped);
        }
        self.ensure_mounted()?;
        self.ensure_not_generating(PanelStatus::TtsGenerating)?;
        let _busy = self.board.acquire(&self.panel_id, Operation::Audio)?;

        if !self.apply(&self.alive, |panel| {
            panel.transition(PanelStatus::TtsGenerating)?;
            panel.error_message = None;
            panel.audio_url = None;
            Ok(())
        })? {
            return Ok(OperationOutcome::Dropped);
        }

        match self
            .services
            .speech()
            .generate_speech(text, voice, &self.template(PromptCategory::Tts))
            .await
        {
            Ok(audio_url) => self.finish(|panel| {
                panel.audio_url = Some(audio_url);
                panel.tts_voice = Some(voice);
            }),
            Err(e) => {
                warn!(error = %e, "Narration failed");
                Ok(self.fail(&self.alive, AUDIO_FAILED)?)
            }
        }
    }

    /// Produce a soundtrack for `prompt`.
    #[instrument(skip(self, prompt), fields(panel_id = %self.panel_id))]
    pub async fn generate_music(&self, prompt: &str) -> VignetteResult<OperationOutcome> {
        if prompt.trim().is_empty() {
            return Ok(OperationOutcome::Skipped);
        }
        self.ensure_mounted()?;
        self.ensure_not_generating(PanelStatus::MusicGenerating)?;
        let _busy = self.board.acquire(&self.panel_id, Operation::Music)?;

        if !self.apply(&self.alive, |panel| {
            panel.transition(PanelStatus::MusicGenerating)?;
            panel.error_message = None;
            panel.music_url = None;
            Ok(())
        })? {
            return Ok(OperationOutcome::Dropped);
        }

        match self
            .services
            .music()
            .generate_music(prompt, &self.template(PromptCategory::Music))
            .await
        {
            Ok(music_url) => {
                let music_prompt = prompt.to_string();
                self.finish(|panel| {
                    panel.music_url = Some(music_url);
                    panel.music_prompt = Some(music_prompt);
                })
            }
            Err(e) => {
                warn!(error = %e, "Music generation failed");
                Ok(self.fail(&self.alive, MUSIC_FAILED)?)
            }
        }
    }

    /// Start a video job and poll it in the background.
    ///
    /// Returns `None` for a blank prompt. Must be called from within a Tokio
    /// runtime.
    #[instrument(skip(self, prompt, request), fields(panel_id = %self.panel_id))]
    pub fn generate_video(
        &self,
        prompt: &str,
        request: VideoRequest,
    ) -> VignetteResult<Option<VideoTask>> {
        if prompt.trim().is_empty() {
            return Ok(None);
        }
        self.ensure_mounted()?;
        self.ensure_not_generating(PanelStatus::VideoGenerating)?;
        let busy = self.board.acquire(&self.panel_id, Operation::Video)?;

        self.board.update(&self.panel_id, |panel| {
            panel.transition(PanelStatus::VideoGenerating)?;
            panel.video_url = None;
            panel.error_message = None;
            Ok(())
        })?;

        Ok(Some(VideoTask::spawn(
            self.clone(),
            prompt.to_string(),
            request,
            self.alive.child_token(),
            busy,
        )))
    }

    /// Default video prompt for this panel: the video template around its image prompt.
    pub fn default_video_prompt(&self) -> String {
        let image_prompt = self
            .panel()
            .and_then(|panel| panel.image_prompt)
            .unwrap_or_default();
        vignette_core::render_template(
            &self.template(PromptCategory::Video),
            &[("prompt", &image_prompt)],
        )
    }

    fn finish<F>(&self, fields: F) -> VignetteResult<OperationOutcome>
    where
        F: FnOnce(&mut Panel),
    {
        if self.apply(&self.alive, |panel| {
            panel.transition(PanelStatus::Complete)?;
            fields(panel);
            Ok(())
        })? {
            Ok(OperationOutcome::Completed)
        } else {
            Ok(OperationOutcome::Dropped)
        }
    }
}
