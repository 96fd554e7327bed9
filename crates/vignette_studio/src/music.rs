//! Real-time music session lifecycle.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use vignette_core::{PcmFormat, wav_data_url};
use vignette_error::{MusicError, MusicErrorKind, VignetteResult};
use vignette_interface::{MusicConfig, MusicConnector, MusicSession, WeightedPrompt};

/// Where a live session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    /// No connection
    #[default]
    Idle,
    /// Audio is streaming
    Playing,
    /// Connected, streaming suspended
    Paused,
    /// Collecting audio and closing
    Stopping,
}

/// Drives one live music session.
///
/// ```text
/// idle → playing ⇄ paused
/// playing/paused → stopping → idle
/// ```
///
/// `play` connects lazily and pushes the current prompts and config;
/// `stop` returns every chunk received since connecting as one WAV clip and
/// always closes the connection.
pub struct MusicSessionManager {
    connector: Arc<dyn MusicConnector>,
    session: Option<Box<dyn MusicSession>>,
    state: SessionState,
    prompts: Vec<WeightedPrompt>,
    config: Option<MusicConfig>,
}

impl std::fmt::Debug for MusicSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicSessionManager")
            .field("state", &self.state)
            .field("connected", &self.session.is_some())
            .field("prompts", &self.prompts)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MusicSessionManager {
    /// Idle manager using `connector`.
    pub fn new(connector: Arc<dyn MusicConnector>) -> Self {
        Self {
            connector,
            session: None,
            state: SessionState::Idle,
            prompts: Vec::new(),
            config: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether audio is streaming.
    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Whether a connection is open.
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Steer with a single prompt at full weight.
    pub async fn set_prompt(&mut self, text: &str) -> VignetteResult<()> {
        self.set_prompts(vec![WeightedPrompt::new(text)]).await
    }

    /// Replace the steering prompts, forwarding them when connected.
    #[instrument(skip(self, prompts), fields(count = prompts.len()))]
    pub async fn set_prompts(&mut self, prompts: Vec<WeightedPrompt>) -> VignetteResult<()> {
        self.prompts = prompts;
        if let Some(session) = self.session.as_mut() {
            session.set_weighted_prompts(&self.prompts).await?;
        }
        Ok(())
    }

    /// Replace generation parameters, forwarding them when connected.
    #[instrument(skip(self))]
    pub async fn set_config(&mut self, config: MusicConfig) -> VignetteResult<()> {
        if let Some(session) = self.session.as_mut() {
            session.set_music_config(&config).await?;
        }
        self.config = Some(config);
        Ok(())
    }

    /// Connect if needed and start or resume playback.
    #[instrument(skip(self), fields(state = %self.state))]
    pub async fn play(&mut self) -> VignetteResult<()> {
        match self.state {
            SessionState::Playing => return Ok(()),
            SessionState::Stopping => return Err(self.invalid("play")),
            SessionState::Idle | SessionState::Paused => {}
        }

        if self.session.is_none() {
            let mut session = self.connector.connect().await?;
            info!("Music session connected");
            if !self.prompts.is_empty() {
                session.set_weighted_prompts(&self.prompts).await?;
            }
            if let Some(config) = &self.config {
                session.set_music_config(config).await?;
            }
            self.session = Some(session);
        }

        self.connected()?.play().await?;
        self.state = SessionState::Playing;
        Ok(())
    }

    /// Suspend playback without closing.
    #[instrument(skip(self), fields(state = %self.state))]
    pub async fn pause(&mut self) -> VignetteResult<()> {
        match self.state {
            SessionState::Paused => return Ok(()),
            SessionState::Playing => {}
            SessionState::Idle => {
                return Err(MusicError::new(MusicErrorKind::NotConnected).into());
            }
            SessionState::Stopping => return Err(self.invalid("pause")),
        }
        self.connected()?.pause().await?;
        self.state = SessionState::Paused;
        Ok(())
    }

    /// Stop, package everything received since connecting as WAV, and close.
    #[instrument(skip(self), fields(state = %self.state))]
    pub async fn stop(&mut self) -> VignetteResult<String> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| MusicError::new(MusicErrorKind::NotConnected))?;
        self.state = SessionState::Stopping;

        let stopped = session.stop().await;
        let chunks = session.drain_audio();
        let pcm: Vec<u8> = chunks.concat();
        debug!(chunks = chunks.len(), bytes = pcm.len(), "Packaging session audio");
        let encoded = wav_data_url(&pcm, PcmFormat::MUSIC);

        if let Err(e) = session.close().await {
            warn!(error = %e, "Music session did not close cleanly");
        }
        self.state = SessionState::Idle;
        info!("Music session closed");

        stopped?;
        Ok(encoded?)
    }

    /// Close without collecting audio.
    #[instrument(skip(self))]
    pub async fn close(&mut self) -> VignetteResult<()> {
        self.state = SessionState::Idle;
        if let Some(mut session) = self.session.take() {
            session.close().await?;
        }
        Ok(())
    }

    fn connected(&mut self) -> Result<&mut Box<dyn MusicSession>, MusicError> {
        self.session
            .as_mut()
            .ok_or_else(|| MusicError::new(MusicErrorKind::NotConnected))
    }

    fn invalid(&self, action: &str) -> vignette_error::VignetteError {
        MusicError::new(MusicErrorKind::InvalidState {
            state: self.state.to_string(),
            action: action.to_string(),
        })
        .into()
    }
}
