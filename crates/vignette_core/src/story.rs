//! Story outline types.

use crate::Panel;
use serde::{Deserialize, Serialize};
use vignette_error::{StudioError, StudioErrorKind};

/// Placeholder used when a confirmed scene has no description.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// One scene of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Short scene title
    #[serde(default)]
    pub title: String,
    /// Paragraph describing the key events of the scene
    #[serde(default)]
    pub description: String,
}

impl Scene {
    /// Create a scene from a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Title, logline and scene breakdown produced from a free-text idea.
///
/// Scene order is significant: the position in `scenes` defines the scene number.
///
/// # Examples
///
/// ```
/// use vignette_core::{Scene, StoryStructure};
///
/// let story = StoryStructure {
///     title: "The Lighthouse".to_string(),
///     logline: "A keeper finds a message in the fog.".to_string(),
///     scenes: vec![Scene::new("Arrival", "The keeper climbs the tower.")],
/// };
/// let panels = story.to_panels();
/// assert_eq!(panels.len(), 1);
/// assert_eq!(panels[0].scene_number, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoryStructure {
    /// Story title
    #[serde(default)]
    pub title: String,
    /// One-sentence logline
    #[serde(default)]
    pub logline: String,
    /// Ordered scenes
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl StoryStructure {
    /// Reject outlines that carry no scenes.
    #[track_caller]
    pub fn validate(&self) -> Result<(), StudioError> {
        if self.scenes.is_empty() {
            return Err(StudioError::new(StudioErrorKind::InvalidStructure));
        }
        Ok(())
    }

    /// Seed one pending panel per scene.
    pub fn to_panels(&self) -> Vec<Panel> {
        self.scenes
            .iter()
            .enumerate()
            .map(|(index, scene)| Panel::new(index, &scene.description))
            .collect()
    }
}
