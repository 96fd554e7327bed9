//! Generation backends for Vignette.
//!
//! - [`GeminiClient`]: outline, script, image prompt and writing assistant
//!   (Gemini text), still images (Imagen), video (Veo) and narration (TTS)
//! - [`LyriaConnector`]: real-time music sessions
//! - [`SimulatedMusicGenerator`]: per-panel soundtrack stand-in
//!
//! # Features
//!
//! - `gemini` (default): the Google backends
//! - `api`: enables tests that make real API calls

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "gemini")]
mod lyria;
mod simulated;

#[cfg(feature = "gemini")]
pub use gemini::{
    ApiErrorEnvelope, GeminiClient, GeminiResult, ImagenParameters, ImagenParametersBuilder,
    ImagenPrediction, ImagenRequest, ImagenResponse, SpeechRequest, SpeechResponse, VeoRequest,
    clean_image_prompt, outline_schema, parse_outline,
};
#[cfg(feature = "gemini")]
pub use lyria::{
    AudioChunk, FilteredPrompt, LyriaConnector, LyriaSession, MusicConfigMessage,
    MusicServerContent, MusicServerMessage, MusicSetup, MusicSetupMessage, PlaybackControl,
    PlaybackControlMessage, WeightedPromptsContent, WeightedPromptsMessage,
};
pub use simulated::SimulatedMusicGenerator;
