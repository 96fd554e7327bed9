//! Message types for the Lyria live music WebSocket protocol.
//!
//! # Protocol Overview
//!
//! 1. Client connects to the `BidiGenerateMusic` endpoint
//! 2. Client sends [`MusicSetupMessage`] naming the model
//! 3. Server responds with `setupComplete`
//! 4. Client steers with weighted prompts, generation config and playback
//!    control; server streams `serverContent.audioChunks`
//! 5. Connection closes when done
//!
//! Audio chunks are base64 raw PCM, 48 kHz stereo 16-bit.

use serde::{Deserialize, Serialize};
use vignette_interface::{MusicConfig, WeightedPrompt};

/// First message after connecting.
#[derive(Debug, Clone, Serialize)]
pub struct MusicSetupMessage {
    /// Setup payload
    pub setup: MusicSetup,
}

/// Model selection for the session.
#[derive(Debug, Clone, Serialize)]
pub struct MusicSetup {
    /// Model name, e.g. `models/lyria-realtime-exp`
    pub model: String,
}

impl MusicSetupMessage {
    /// Setup for `model`, adding the `models/` prefix when missing.
    pub fn new(model: &str) -> Self {
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        Self {
            setup: MusicSetup { model },
        }
    }
}

/// Replaces the steering prompts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedPromptsMessage {
    /// Prompt payload
    pub client_content: WeightedPromptsContent,
}

/// Weighted prompt list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedPromptsContent {
    /// Prompts with weights
    pub weighted_prompts: Vec<WeightedPrompt>,
}

impl WeightedPromptsMessage {
    /// Message carrying `prompts`.
    pub fn new(prompts: &[WeightedPrompt]) -> Self {
        Self {
            client_content: WeightedPromptsContent {
                weighted_prompts: prompts.to_vec(),
            },
        }
    }
}

/// Updates generation parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicConfigMessage {
    /// Parameters, unset fields omitted
    pub music_generation_config: MusicConfig,
}

/// Playback commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackControl {
    /// Start or resume streaming audio
    Play,
    /// Suspend streaming
    Pause,
    /// Stop streaming and reset context
    Stop,
}

/// Playback control message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackControlMessage {
    /// Command
    pub playback_control: PlaybackControl,
}

/// Any message from the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicServerMessage {
    /// Setup confirmation
    #[serde(default)]
    pub setup_complete: Option<serde_json::Value>,
    /// Generated audio
    #[serde(default)]
    pub server_content: Option<MusicServerContent>,
    /// A prompt rejected by the safety filter
    #[serde(default)]
    pub filtered_prompt: Option<FilteredPrompt>,
    /// Disconnect warning
    #[serde(default)]
    pub go_away: Option<serde_json::Value>,
}

/// Streamed audio payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicServerContent {
    /// Chunks in playback order
    #[serde(default)]
    pub audio_chunks: Vec<AudioChunk>,
}

/// One base64 PCM chunk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioChunk {
    /// Base64 PCM
    #[serde(default)]
    pub data: String,
    /// e.g. `audio/l16;rate=48000;channels=2`
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Prompt the server refused.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredPrompt {
    /// Prompt text
    #[serde(default)]
    pub text: String,
    /// Why it was filtered
    #[serde(default)]
    pub filtered_reason: Option<String>,
}

impl MusicServerMessage {
    /// Check if this is a setup complete message.
    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete.is_some()
    }

    /// Check if this is a go away (disconnect) message.
    pub fn is_go_away(&self) -> bool {
        self.go_away.is_some()
    }

    /// Base64 payloads of every non-empty audio chunk.
    pub fn audio_payloads(&self) -> impl Iterator<Item = &str> {
        self.server_content
            .iter()
            .flat_map(|content| content.audio_chunks.iter())
            .map(|chunk| chunk.data.as_str())
            .filter(|data| !data.is_empty())
    }
}
