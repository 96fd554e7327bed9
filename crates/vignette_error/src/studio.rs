//! Storyboard studio error types.

/// Specific error conditions for the storyboard pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StudioErrorKind {
    /// The story idea was blank
    #[display("Please enter a story idea.")]
    EmptyIdea,
    /// The outline came back without any scenes
    #[display("The generated story structure is invalid. Please try again.")]
    InvalidStructure,
    /// No panel with the given id exists on the board
    #[display("Panel not found: {}", _0)]
    PanelNotFound(String),
    /// The requested status change is not in the transition table
    #[display("Panel {} cannot move from {} to {}", panel, from, to)]
    InvalidTransition {
        /// Panel id
        panel: String,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// The same operation is already running on this panel
    #[display("Panel {} is already running {}", panel, operation)]
    Busy {
        /// Panel id
        panel: String,
        /// Operation name
        operation: String,
    },
    /// The panel view was torn down
    #[display("Panel {} is no longer mounted", _0)]
    Unmounted(String),
    /// A wizard step beyond the highest reached step was requested
    #[display("Step {} has not been unlocked yet", _0)]
    StepLocked(String),
    /// The requested wizard action does not apply to the current step
    #[display("Action not available in step {}", _0)]
    WrongStep(String),
    /// Scene index outside the outline
    #[display("Scene {} does not exist", _0)]
    SceneOutOfRange(usize),
    /// Production requires every panel to be complete
    #[display("Complete all scenes before proceeding to production")]
    NotReadyForProduction,
}

/// Studio error with location tracking.
///
/// # Examples
///
/// ```
/// use vignette_error::{StudioError, StudioErrorKind};
///
/// let err = StudioError::new(StudioErrorKind::PanelNotFound("scene-9".to_string()));
/// assert!(format!("{}", err).contains("scene-9"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Studio Error: {} at line {} in {}", kind, line, file)]
pub struct StudioError {
    kind: StudioErrorKind,
    line: u32,
    file: &'static str,
}

impl StudioError {
    /// Create a new studio error with caller location tracking.
    #[track_caller]
    pub fn new(kind: StudioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StudioErrorKind {
        &self.kind
    }
}
