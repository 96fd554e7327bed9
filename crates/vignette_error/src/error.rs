//! Top-level error wrapper types.

use crate::{ConfigError, GeminiError, HttpError, IoError, JsonError, MusicError, StudioError};

/// Every error condition the workspace can surface.
///
/// # Examples
///
/// ```
/// use vignette_error::{VignetteError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: VignetteError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VignetteErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Filesystem error
    #[from(IoError)]
    Io(IoError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini API error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Storyboard pipeline error
    #[from(StudioError)]
    Studio(StudioError),
    /// Live music session error
    #[from(MusicError)]
    Music(MusicError),
}

/// Vignette error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vignette_error::{ConfigError, VignetteResult};
///
/// fn might_fail() -> VignetteResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vignette Error: {}", _0)]
pub struct VignetteError(Box<VignetteErrorKind>);

impl VignetteError {
    /// Create a new error from a kind.
    pub fn new(kind: VignetteErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VignetteErrorKind {
        &self.0
    }

    /// Message suitable for showing to a user, without location details.
    pub fn user_message(&self) -> String {
        match self.kind() {
            VignetteErrorKind::Http(e) => e.message.clone(),
            VignetteErrorKind::Json(e) => e.message.clone(),
            VignetteErrorKind::Io(e) => e.message.clone(),
            VignetteErrorKind::Config(e) => e.message.clone(),
            VignetteErrorKind::Gemini(e) => e.kind.to_string(),
            VignetteErrorKind::Studio(e) => e.kind().to_string(),
            VignetteErrorKind::Music(e) => e.kind().to_string(),
        }
    }
}

// Generic From implementation for any type that converts to VignetteErrorKind
impl<T> From<T> for VignetteError
where
    T: Into<VignetteErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vignette operations.
pub type VignetteResult<T> = std::result::Result<T, VignetteError>;
