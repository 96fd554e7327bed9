//! Outline editing and the writing assistant.

use std::sync::Arc;
use tracing::{instrument, warn};
use vignette_core::{PromptCategory, Scene, StoryStructure};
use vignette_error::{StudioError, StudioErrorKind};
use vignette_interface::StoryWriter;

use crate::services::{SharedPrompts, template};

/// Writing assistant actions on the selected scene.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum AssistAction {
    /// Rephrase
    Rewrite,
    /// Add detail
    Expand,
    /// Condense
    Shrink,
    /// Rephrase in the given tone
    ChangeTone(String),
}

/// Editable copy of an outline.
pub struct StructureEditor {
    structure: StoryStructure,
    selected: Option<usize>,
    writer: Arc<dyn StoryWriter>,
    prompts: SharedPrompts,
}

impl std::fmt::Debug for StructureEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureEditor")
            .field("structure", &self.structure)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl StructureEditor {
    /// Start editing `structure`.
    pub fn new(structure: StoryStructure, writer: Arc<dyn StoryWriter>, prompts: SharedPrompts) -> Self {
        Self {
            structure,
            selected: None,
            writer,
            prompts,
        }
    }

    /// Outline as edited so far.
    pub fn structure(&self) -> &StoryStructure {
        &self.structure
    }

    /// Finish editing.
    pub fn into_structure(self) -> StoryStructure {
        self.structure
    }

    /// Index of the selected scene.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.structure.title = title.into();
    }

    pub fn set_logline(&mut self, logline: impl Into<String>) {
        self.structure.logline = logline.into();
    }

    pub fn set_scene_description(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> Result<(), StudioError> {
        self.scene_mut(index)?.description = description.into();
        Ok(())
    }

    /// Append `Scene {n}` with an empty description; returns its index.
    pub fn add_scene(&mut self) -> usize {
        let number = self.structure.scenes.len() + 1;
        self.structure
            .scenes
            .push(Scene::new(format!("Scene {}", number), ""));
        number - 1
    }

    /// Remove a scene, keeping the selection on the same scene when possible.
    pub fn remove_scene(&mut self, index: usize) -> Result<Scene, StudioError> {
        if index >= self.structure.scenes.len() {
            return Err(StudioError::new(StudioErrorKind::SceneOutOfRange(index)));
        }
        let removed = self.structure.scenes.remove(index);
        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        Ok(removed)
    }

    /// Select the scene the assistant works on.
    pub fn select_scene(&mut self, index: usize) -> Result<(), StudioError> {
        if index >= self.structure.scenes.len() {
            return Err(StudioError::new(StudioErrorKind::SceneOutOfRange(index)));
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Run the writing assistant on the selected scene.
    ///
    /// Returns `true` when the description was replaced. No selection, a
    /// blank description, a blank tone or a failed request leave the text
    /// unchanged.
    #[instrument(skip(self), fields(selected = ?self.selected))]
    pub async fn assist(&mut self, action: AssistAction) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        let Some(current) = self
            .structure
            .scenes
            .get(index)
            .map(|scene| scene.description.clone())
        else {
            return false;
        };
        if current.trim().is_empty() {
            return false;
        }

        let result = match &action {
            AssistAction::Rewrite => {
                self.writer
                    .rewrite(&current, &template(&self.prompts, PromptCategory::Rewrite))
                    .await
            }
            AssistAction::Expand => {
                self.writer
                    .expand(&current, &template(&self.prompts, PromptCategory::Expand))
                    .await
            }
            AssistAction::Shrink => {
                self.writer
                    .shrink(&current, &template(&self.prompts, PromptCategory::Shrink))
                    .await
            }
            AssistAction::ChangeTone(tone) => {
                let tone = tone.trim();
                if tone.is_empty() {
                    return false;
                }
                self.writer
                    .change_tone(
                        &current,
                        tone,
                        &template(&self.prompts, PromptCategory::ChangeTone),
                    )
                    .await
            }
        };

        match result {
            Ok(text) => {
                if let Some(scene) = self.structure.scenes.get_mut(index) {
                    scene.description = text;
                }
                true
            }
            Err(e) => {
                warn!(error = %e, %action, "Writing assistant failed");
                false
            }
        }
    }

    fn scene_mut(&mut self, index: usize) -> Result<&mut Scene, StudioError> {
        self.structure
            .scenes
            .get_mut(index)
            .ok_or_else(|| StudioError::new(StudioErrorKind::SceneOutOfRange(index)))
    }
}
