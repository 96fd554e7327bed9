//! Google Gemini API client implementation.
//!
//! [`GeminiClient`] talks to the text model through `gemini-rust` and to the
//! Imagen, Veo and speech endpoints over plain REST.

mod client;
mod dto;
mod text;

pub use client::GeminiClient;
pub use dto::{
    ApiErrorEnvelope, ImagenParameters, ImagenParametersBuilder, ImagenPrediction, ImagenRequest,
    ImagenResponse, SpeechRequest, SpeechResponse, VeoRequest,
};
pub use text::{clean_image_prompt, outline_schema, parse_outline};

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, vignette_error::GeminiError>;
