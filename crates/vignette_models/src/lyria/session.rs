//! WebSocket client for Lyria real-time music.
//!
//! - [`LyriaConnector`] - Factory holding credentials and endpoint
//! - [`LyriaSession`] - Open connection; a background task buffers audio

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::env;
use std::sync::{Arc, Mutex};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, trace, warn};

use vignette_core::VignetteConfig;
use vignette_error::{
    GeminiError, GeminiErrorKind, MusicError, MusicErrorKind, VignetteResult,
};
use vignette_interface::{MusicConfig, MusicConnector, MusicSession, WeightedPrompt};

use super::protocol::{
    MusicConfigMessage, MusicServerMessage, MusicSetupMessage, PlaybackControl,
    PlaybackControlMessage, WeightedPromptsMessage,
};
use crate::gemini::GeminiResult;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type AudioBuffer = Arc<Mutex<Vec<Vec<u8>>>>;

/// Opens Lyria live music sessions.
#[derive(Clone)]
pub struct LyriaConnector {
    api_key: String,
    endpoint: String,
    model: String,
}

impl std::fmt::Debug for LyriaConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LyriaConnector")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LyriaConnector {
    /// Create a connector, reading the API key from `GEMINI_API_KEY`.
    #[instrument(name = "lyria_connector_new", skip(config))]
    pub fn new(config: &VignetteConfig) -> VignetteResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Ok(Self::with_api_key(api_key, config))
    }

    /// Create a connector with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, config: &VignetteConfig) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: config.api.live_music_url.clone(),
            model: config.models.music.clone(),
        }
    }
}

#[async_trait]
impl MusicConnector for LyriaConnector {
    #[instrument(name = "lyria_connect", skip(self), fields(model = %self.model))]
    async fn connect(&self) -> VignetteResult<Box<dyn MusicSession>> {
        let session = LyriaSession::open(&self.endpoint, &self.api_key, &self.model).await?;
        Ok(Box::new(session))
    }
}

/// Active Lyria session.
///
/// Every audio chunk received since the handshake is appended to an in-memory
/// buffer until [`MusicSession::drain_audio`] takes it.
pub struct LyriaSession {
    sink: SplitSink<WsStream, Message>,
    buffer: AudioBuffer,
    receiver: JoinHandle<()>,
    closed: bool,
}

impl LyriaSession {
    async fn open(endpoint: &str, api_key: &str, model: &str) -> GeminiResult<Self> {
        info!("Connecting to Lyria live music for model: {}", model);

        let url = format!("{}?key={}", endpoint, api_key);
        let (mut ws_stream, _) = connect_async(&url).await.map_err(|e| {
            error!("WebSocket connection failed: {}", e);
            GeminiError::new(GeminiErrorKind::WebSocketConnection(e.to_string()))
        })?;

        debug!("WebSocket connection established");
        Self::setup_handshake(&mut ws_stream, model).await?;

        let (sink, stream) = ws_stream.split();
        let buffer = AudioBuffer::default();
        let receiver = tokio::spawn(receive_audio(stream, Arc::clone(&buffer)));

        info!("Lyria session established");
        Ok(Self {
            sink,
            buffer,
            receiver,
            closed: false,
        })
    }

    /// Send setup and wait for `setupComplete`.
    async fn setup_handshake(ws_stream: &mut WsStream, model: &str) -> GeminiResult<()> {
        let json = serde_json::to_string(&MusicSetupMessage::new(model)).map_err(|e| {
            GeminiError::new(GeminiErrorKind::WebSocketHandshake(format!(
                "Serialization error: {}",
                e
            )))
        })?;

        ws_stream
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| {
                error!("Failed to send setup message: {}", e);
                GeminiError::new(GeminiErrorKind::WebSocketHandshake(format!(
                    "Send error: {}",
                    e
                )))
            })?;

        debug!("Setup message sent, waiting for setupComplete");

        while let Some(msg_result) = ws_stream.next().await {
            let msg = msg_result.map_err(|e| {
                GeminiError::new(GeminiErrorKind::WebSocketHandshake(format!(
                    "Receive error: {}",
                    e
                )))
            })?;

            let Some(server_msg) = parse_frame(&msg) else {
                continue;
            };
            let server_msg = server_msg?;

            if server_msg.is_setup_complete() {
                debug!("Received setupComplete");
                return Ok(());
            } else if server_msg.is_go_away() {
                error!("Server sent goAway during setup");
                return Err(GeminiError::new(GeminiErrorKind::ServerDisconnect(
                    "goAway during setup".to_string(),
                )));
            } else {
                warn!("Unexpected message during setup: {:?}", server_msg);
            }
        }

        Err(GeminiError::new(GeminiErrorKind::WebSocketHandshake(
            "Connection closed before setup complete".to_string(),
        )))
    }

    async fn send<T: Serialize>(&mut self, message: &T) -> VignetteResult<()> {
        if self.closed {
            return Err(MusicError::new(MusicErrorKind::NotConnected).into());
        }

        let json = serde_json::to_string(message).map_err(|e| {
            GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "Serialization error: {}",
                e
            )))
        })?;
        trace!("Message JSON: {}", json);

        self.sink
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| {
                error!("Failed to send message: {}", e);
                GeminiError::new(GeminiErrorKind::ApiRequest(format!("Send error: {}", e)))
            })?;
        Ok(())
    }

    async fn playback(&mut self, control: PlaybackControl) -> VignetteResult<()> {
        debug!(%control, "Playback control");
        self.send(&PlaybackControlMessage {
            playback_control: control,
        })
        .await
    }
}

/// Decode a text or binary frame; control frames yield `None`.
fn parse_frame(msg: &Message) -> Option<GeminiResult<MusicServerMessage>> {
    let parsed = match msg {
        Message::Text(text) => serde_json::from_str::<MusicServerMessage>(text),
        Message::Binary(bytes) => serde_json::from_slice::<MusicServerMessage>(bytes),
        _ => return None,
    };
    Some(parsed.map_err(|e| {
        GeminiError::new(GeminiErrorKind::InvalidServerMessage(format!(
            "Parse error: {}",
            e
        )))
    }))
}

/// Background loop appending decoded chunks to `buffer`.
async fn receive_audio(mut stream: SplitStream<WsStream>, buffer: AudioBuffer) {
    debug!("Starting to receive audio data");
    while let Some(msg_result) = stream.next().await {
        let msg = match msg_result {
            Ok(msg) => msg,
            Err(e) => {
                error!("Error receiving audio from Lyria session: {}", e);
                break;
            }
        };

        if let Message::Close(frame) = &msg {
            debug!(?frame, "Lyria session closed by server");
            break;
        }

        let server_msg = match parse_frame(&msg) {
            Some(Ok(server_msg)) => server_msg,
            Some(Err(e)) => {
                warn!("Skipping unreadable server message: {}", e);
                continue;
            }
            None => continue,
        };

        if let Some(filtered) = &server_msg.filtered_prompt {
            warn!(prompt = %filtered.text, reason = ?filtered.filtered_reason, "Prompt filtered");
        }

        if server_msg.is_go_away() {
            warn!("Server disconnecting");
            break;
        }

        for payload in server_msg.audio_payloads() {
            match STANDARD.decode(payload) {
                Ok(pcm) => {
                    trace!(bytes = pcm.len(), "Audio chunk");
                    buffer
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .push(pcm);
                }
                Err(e) => warn!("Dropping undecodable audio chunk: {}", e),
            }
        }
    }
}

#[async_trait]
impl MusicSession for LyriaSession {
    #[instrument(skip_all, fields(prompts = prompts.len()))]
    async fn set_weighted_prompts(&mut self, prompts: &[WeightedPrompt]) -> VignetteResult<()> {
        self.send(&WeightedPromptsMessage::new(prompts)).await
    }

    #[instrument(skip_all)]
    async fn set_music_config(&mut self, config: &MusicConfig) -> VignetteResult<()> {
        self.send(&MusicConfigMessage {
            music_generation_config: config.clone(),
        })
        .await
    }

    async fn play(&mut self) -> VignetteResult<()> {
        self.playback(PlaybackControl::Play).await
    }

    async fn pause(&mut self) -> VignetteResult<()> {
        self.playback(PlaybackControl::Pause).await
    }

    async fn stop(&mut self) -> VignetteResult<()> {
        self.playback(PlaybackControl::Stop).await
    }

    fn drain_audio(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(
            &mut *self
                .buffer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    #[instrument(skip_all)]
    async fn close(&mut self) -> VignetteResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.receiver.abort();
        self.sink.close().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::StreamInterrupted(format!(
                "Close error: {}",
                e
            )))
        })?;
        info!("Lyria session closed");
        Ok(())
    }
}

impl Drop for LyriaSession {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}
