//! Error types for the Vignette storyboard studio.
//!
//! This crate provides the foundation error types used throughout the Vignette workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vignette_error::{HttpError, VignetteResult};
//!
//! fn fetch_image() -> VignetteResult<Vec<u8>> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! assert!(fetch_image().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gemini;
mod http;
mod io;
mod json;
mod music;
mod studio;

pub use config::ConfigError;
pub use error::{VignetteError, VignetteErrorKind, VignetteResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use http::HttpError;
pub use io::IoError;
pub use json::JsonError;
pub use music::{MusicError, MusicErrorKind};
pub use studio::{StudioError, StudioErrorKind};
