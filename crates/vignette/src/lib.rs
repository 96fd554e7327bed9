//! Vignette - AI storyboard studio
//!
//! Vignette turns a one-line story idea into a produced storyboard. A text
//! model expands the idea into an outline; each scene is then scripted,
//! prompted and illustrated, and finally animated, narrated and scored.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vignette::{GeminiClient, Services, SimulatedMusicGenerator, StudioSession, VignetteConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VignetteConfig::load()?;
//!     let client = Arc::new(GeminiClient::new(&config)?);
//!     let music = Arc::new(SimulatedMusicGenerator::from_settings(&config.studio));
//!     let mut session = StudioSession::new(Services::from_client(client, music), config.studio);
//!
//!     let structure = session.submit_idea("A lighthouse keeper befriends a storm").await?;
//!     session.confirm_structure(structure)?;
//!     for panel in session.controllers()? {
//!         panel.run_generation().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` (default) - Google Gemini, Imagen, Veo, TTS and Lyria backends
//! - `api` - enables tests that make real API calls
//!
//! # Architecture
//!
//! - `vignette_error` - error types
//! - `vignette_core` - story, panel, media, prompt and config types
//! - `vignette_interface` - backend capability traits
//! - `vignette_models` - Gemini-family backends and the simulated music stand-in
//! - `vignette_studio` - storyboard, panel pipeline, video polling, music sessions, wizard
//!
//! This crate re-exports everything and adds artifact export and logging setup.

#![forbid(unsafe_code)]

pub use vignette_core::*;
pub use vignette_error::*;
pub use vignette_interface::*;
pub use vignette_models::*;
pub use vignette_studio::*;

pub mod export;
pub mod report;
pub mod telemetry;

pub use export::{ExportSummary, StoryboardExport, export_storyboard, write_data_url};
pub use report::{outline_text, status_line};
pub use telemetry::{default_filter, init_console_telemetry};
