//! Music session error types.

/// Specific error conditions for live music sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MusicErrorKind {
    /// An operation needed an open session
    #[display("Session not connected.")]
    NotConnected,
    /// The session state machine rejected the action
    #[display("Cannot {} while {}", action, state)]
    InvalidState {
        /// Current state
        state: String,
        /// Attempted action
        action: String,
    },
    /// Buffered audio could not be packaged
    #[display("Audio encoding failed: {}", _0)]
    Encoding(String),
}

/// Music session error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Music Error: {} at line {} in {}", kind, line, file)]
pub struct MusicError {
    kind: MusicErrorKind,
    line: u32,
    file: &'static str,
}

impl MusicError {
    /// Create a new music error with caller location tracking.
    #[track_caller]
    pub fn new(kind: MusicErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MusicErrorKind {
        &self.kind
    }
}
