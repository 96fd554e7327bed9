//! Lyria real-time music over WebSockets.

mod protocol;
mod session;

pub use protocol::{
    AudioChunk, FilteredPrompt, MusicConfigMessage, MusicServerContent, MusicServerMessage,
    MusicSetup, MusicSetupMessage, PlaybackControl, PlaybackControlMessage,
    WeightedPromptsContent, WeightedPromptsMessage,
};
pub use session::{LyriaConnector, LyriaSession};
