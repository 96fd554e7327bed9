//! Storyboard panel record.

use crate::{NO_DESCRIPTION, PanelStatus, Voice, VideoOperation};
use serde::{Deserialize, Serialize};
use vignette_error::{StudioError, StudioErrorKind};

/// Generation progress for one scene of the storyboard.
///
/// Optional fields fill in as stages complete. A panel is only ever removed by
/// discarding the whole storyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Stable id, `scene-{index}`
    pub id: String,
    /// 1-based scene number
    pub scene_number: usize,
    /// Scene description taken from the outline
    pub scene_description: String,
    /// Full scene script, partial while streaming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Prompt used for image generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    /// Rendered image as a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Authorized video URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Narration as a WAV data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Background music as a WAV data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    /// Text narrated by speech synthesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_script: Option<String>,
    /// Voice used for the last narration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_voice: Option<Voice>,
    /// Prompt used for the last music request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_prompt: Option<String>,
    /// Current lifecycle stage
    pub status: PanelStatus,
    /// Message for the most recent failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Handle of the running video job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_operation: Option<VideoOperation>,
}

impl Panel {
    /// Seed a pending panel for the scene at `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vignette_core::{Panel, PanelStatus, NO_DESCRIPTION};
    ///
    /// let panel = Panel::new(2, "   ");
    /// assert_eq!(panel.id, "scene-2");
    /// assert_eq!(panel.scene_number, 3);
    /// assert_eq!(panel.scene_description, NO_DESCRIPTION);
    /// assert_eq!(panel.status, PanelStatus::Pending);
    /// ```
    pub fn new(index: usize, description: &str) -> Self {
        let scene_description = if description.trim().is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            description.to_string()
        };
        Self {
            id: format!("scene-{index}"),
            scene_number: index + 1,
            scene_description,
            script: None,
            image_prompt: None,
            image_url: None,
            video_url: None,
            audio_url: None,
            music_url: None,
            tts_script: None,
            tts_voice: None,
            music_prompt: None,
            status: PanelStatus::Pending,
            error_message: None,
            video_operation: None,
        }
    }

    /// Move to `next`, rejecting moves outside the transition table.
    ///
    /// The panel is left untouched when the move is rejected.
    #[track_caller]
    pub fn transition(&mut self, next: PanelStatus) -> Result<(), StudioError> {
        if !self.status.permits(next) {
            return Err(StudioError::new(StudioErrorKind::InvalidTransition {
                panel: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            }));
        }
        self.status = next;
        Ok(())
    }

    /// Record a failure: status `error` plus the user-facing message.
    #[track_caller]
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), StudioError> {
        self.transition(PanelStatus::Error)?;
        self.error_message = Some(message.into());
        Ok(())
    }

    /// Whether every main pipeline output is present.
    pub fn is_complete(&self) -> bool {
        self.status == PanelStatus::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_transition_leaves_panel_untouched() {
        let mut panel = Panel::new(0, "A lighthouse at dusk");
        let before = panel.clone();

        let err = panel.transition(PanelStatus::Complete).unwrap_err();
        assert!(matches!(
            err.kind(),
            StudioErrorKind::InvalidTransition { from, to, .. }
                if from == "pending" && to == "complete"
        ));
        assert_eq!(panel, before);
    }

    #[test]
    fn fail_sets_message_and_status() {
        let mut panel = Panel::new(0, "desc");
        panel.transition(PanelStatus::Scripting).unwrap();
        panel.fail("An error occurred during generation.").unwrap();
        assert_eq!(panel.status, PanelStatus::Error);
        assert_eq!(
            panel.error_message.as_deref(),
            Some("An error occurred during generation.")
        );
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let panel = Panel::new(1, "desc");
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["sceneNumber"], 2);
        assert_eq!(json["status"], "pending");
        assert!(json.get("imageUrl").is_none());
    }
}
