//! Panel generation status and its transition table.

use serde::{Deserialize, Serialize};

/// Where a panel is in its generation lifecycle.
///
/// The main pipeline walks `Pending → Scripting → Prompting → Imaging → Complete`.
/// Side stages (`TtsGenerating`, `VideoGenerating`, `MusicGenerating`, and image
/// regeneration through `Imaging`) are entered later from a settled panel.
///
/// # Examples
///
/// ```
/// use vignette_core::PanelStatus;
///
/// assert!(PanelStatus::Pending.permits(PanelStatus::Scripting));
/// assert!(!PanelStatus::Pending.permits(PanelStatus::VideoGenerating));
/// assert_eq!(PanelStatus::TtsGenerating.to_string(), "tts-generating");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PanelStatus {
    /// Waiting for the user to start generation
    #[default]
    Pending,
    /// Script is streaming in
    Scripting,
    /// Image prompt is being written
    Prompting,
    /// Image is being rendered
    Imaging,
    /// Video job is running
    VideoGenerating,
    /// Narration is being synthesized
    TtsGenerating,
    /// Music is being generated
    MusicGenerating,
    /// Last requested stage finished
    Complete,
    /// Last requested stage failed
    Error,
}

impl PanelStatus {
    /// Stages entered from a settled panel that may overlap one another.
    pub fn is_side_stage(self) -> bool {
        matches!(
            self,
            PanelStatus::TtsGenerating | PanelStatus::VideoGenerating | PanelStatus::MusicGenerating
        )
    }

    /// `Complete` or `Error`.
    pub fn is_settled(self) -> bool {
        matches!(self, PanelStatus::Complete | PanelStatus::Error)
    }

    /// Any stage with a request in flight.
    pub fn is_in_progress(self) -> bool {
        !self.is_settled() && self != PanelStatus::Pending
    }

    /// Whether the transition table allows moving from `self` to `next`.
    ///
    /// Side stages may start from `imaging` because an image regeneration
    /// also runs there. Callers tell it apart from the main pipeline's own
    /// imaging stage.
    pub fn permits(self, next: PanelStatus) -> bool {
        use PanelStatus::*;
        match (self, next) {
            (Pending, Scripting) => true,
            (Scripting, Prompting) | (Prompting, Imaging) | (Imaging, Complete) => true,
            (Scripting | Prompting | Imaging, Error) => true,
            (from, Imaging | TtsGenerating | VideoGenerating | MusicGenerating) => {
                from.is_settled() || from.is_side_stage() || from == Imaging
            }
            (from, Complete | Error) => from.is_settled() || from.is_side_stage(),
            _ => false,
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PanelStatus::Pending => "Ready",
            PanelStatus::Scripting => "Writing script...",
            PanelStatus::Prompting => "Creating prompt...",
            PanelStatus::Imaging => "Generating image...",
            PanelStatus::VideoGenerating => "Generating video...",
            PanelStatus::TtsGenerating => "Generating audio...",
            PanelStatus::MusicGenerating => "Generating music...",
            PanelStatus::Complete => "Complete",
            PanelStatus::Error => "Error",
        }
    }
}
