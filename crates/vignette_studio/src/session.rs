//! Four-step storyboard wizard.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::{error, info, instrument};

use vignette_core::{Language, PromptStore, StoryStructure, StudioSettings};
use vignette_error::{StudioError, StudioErrorKind, VignetteResult};

use crate::board::{BoardSettings, Storyboard};
use crate::controller::PanelController;
use crate::editor::StructureEditor;
use crate::services::{Services, SharedPrompts, template};

/// Prefix of the message kept when the outline request fails.
pub const STRUCTURE_FAILED: &str = "Failed to generate story structure.";

/// Wizard steps, in order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StudioStep {
    /// Enter the idea
    #[default]
    IdeaInput,
    /// Edit the outline
    StructureEditor,
    /// Generate panels
    StoryboardView,
    /// Video, narration and music
    ProductionStudio,
}

/// One storyboarding session, from idea to production.
///
/// The session owns the prompt templates for its language and hands them to
/// every editor and controller it creates.
#[derive(Debug)]
pub struct StudioSession {
    services: Services,
    prompts: SharedPrompts,
    settings: StudioSettings,
    step: StudioStep,
    highest_step: StudioStep,
    structure: Option<StoryStructure>,
    board: Option<Storyboard>,
    error: Option<String>,
}

impl StudioSession {
    /// Fresh session in the configured language.
    pub fn new(services: Services, settings: StudioSettings) -> Self {
        let prompts = Arc::new(RwLock::new(PromptStore::new(*settings.language())));
        Self {
            services,
            prompts,
            settings,
            step: StudioStep::IdeaInput,
            highest_step: StudioStep::IdeaInput,
            structure: None,
            board: None,
            error: None,
        }
    }

    pub fn step(&self) -> StudioStep {
        self.step
    }

    pub fn highest_step(&self) -> StudioStep {
        self.highest_step
    }

    /// Message of the last failed idea submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn structure(&self) -> Option<&StoryStructure> {
        self.structure.as_ref()
    }

    pub fn board(&self) -> Option<&Storyboard> {
        self.board.as_ref()
    }

    pub fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    /// Templates shared with this session's components.
    pub fn prompts(&self) -> SharedPrompts {
        Arc::clone(&self.prompts)
    }

    pub fn language(&self) -> Language {
        self.prompts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .language()
    }

    /// Swap every template to `language`'s defaults.
    #[instrument(skip(self))]
    pub fn switch_language(&self, language: Language) {
        self.prompts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_language(language);
    }

    /// Jump to an already reached step.
    pub fn go_to_step(&mut self, step: StudioStep) -> Result<(), StudioError> {
        if step > self.highest_step {
            return Err(StudioError::new(StudioErrorKind::StepLocked(step.to_string())));
        }
        self.step = step;
        Ok(())
    }

    /// Expand an idea into an outline and open the editor.
    #[instrument(skip(self, idea), fields(chars = idea.len()))]
    pub async fn submit_idea(&mut self, idea: &str) -> VignetteResult<StoryStructure> {
        if idea.trim().is_empty() {
            let err = StudioError::new(StudioErrorKind::EmptyIdea);
            self.error = Some(err.kind().to_string());
            return Err(err.into());
        }
        self.error = None;

        let outline_template = template(&self.prompts, vignette_core::PromptCategory::StoryStructure);
        let outcome = self
            .services
            .writer()
            .generate_outline(idea, &outline_template)
            .await
            .and_then(|structure| {
                structure.validate()?;
                Ok(structure)
            });

        match outcome {
            Ok(structure) => {
                info!(title = %structure.title, scenes = structure.scenes.len(), "Outline ready");
                self.structure = Some(structure.clone());
                self.step = StudioStep::StructureEditor;
                self.highest_step = StudioStep::StructureEditor;
                Ok(structure)
            }
            Err(e) => {
                error!(error = %e, "Outline request failed");
                self.error = Some(format!("{} {}", STRUCTURE_FAILED, e.user_message()));
                Err(e)
            }
        }
    }

    /// Editor over the current outline.
    pub fn editor(&self) -> Result<StructureEditor, StudioError> {
        let structure = self
            .structure
            .clone()
            .ok_or_else(|| StudioError::new(StudioErrorKind::WrongStep(self.step.to_string())))?;
        Ok(StructureEditor::new(
            structure,
            Arc::clone(self.services.writer()),
            self.prompts(),
        ))
    }

    /// Seed a fresh storyboard with one pending panel per scene.
    #[instrument(skip(self, structure), fields(scenes = structure.scenes.len()))]
    pub fn confirm_structure(&mut self, structure: StoryStructure) -> Result<Storyboard, StudioError> {
        structure.validate()?;
        let settings = BoardSettings {
            aspect_ratio: *self.settings.default_aspect_ratio(),
            ..BoardSettings::default()
        };
        let board = Storyboard::from_structure(&structure, settings);
        self.structure = Some(structure);
        self.board = Some(board.clone());
        self.step = StudioStep::StoryboardView;
        self.highest_step = StudioStep::StoryboardView;
        Ok(board)
    }

    /// Controller for one panel of the current storyboard.
    pub fn controller(&self, panel_id: &str) -> Result<PanelController, StudioError> {
        let board = self
            .board
            .clone()
            .ok_or_else(|| StudioError::new(StudioErrorKind::WrongStep(self.step.to_string())))?;
        PanelController::mount(
            board,
            panel_id,
            self.services.clone(),
            self.prompts(),
            self.settings.clone(),
        )
    }

    /// One controller per panel, in scene order.
    pub fn controllers(&self) -> Result<Vec<PanelController>, StudioError> {
        let Some(board) = &self.board else {
            return Err(StudioError::new(StudioErrorKind::WrongStep(
                self.step.to_string(),
            )));
        };
        board
            .panels()
            .iter()
            .map(|panel| self.controller(&panel.id))
            .collect()
    }

    /// Open production once every panel is complete.
    pub fn proceed_to_production(&mut self) -> Result<(), StudioError> {
        let ready = self.board.as_ref().is_some_and(Storyboard::all_complete);
        if !ready {
            return Err(StudioError::new(StudioErrorKind::NotReadyForProduction));
        }
        self.step = StudioStep::ProductionStudio;
        self.highest_step = StudioStep::ProductionStudio;
        Ok(())
    }

    /// Discard the outline and return to idea entry.
    pub fn back_to_idea(&mut self) {
        self.step = StudioStep::IdeaInput;
        self.structure = None;
        self.error = None;
    }

    /// Start over.
    pub fn reset(&mut self) {
        info!("Session reset");
        self.step = StudioStep::IdeaInput;
        self.highest_step = StudioStep::IdeaInput;
        self.structure = None;
        self.board = None;
        self.error = None;
    }
}
