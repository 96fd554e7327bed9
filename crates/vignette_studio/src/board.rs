//! Shared storyboard record.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, trace};
use vignette_core::{AspectRatio, Panel, STYLE_PRESETS, StoryStructure, StylePreset};
use vignette_error::{StudioError, StudioErrorKind};

const EVENT_CAPACITY: usize = 256;

/// Kinds of work a panel can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Operation {
    /// Script, image prompt and image
    Generation,
    /// Image regeneration from an edited prompt
    Image,
    /// Narration
    Audio,
    /// Video job and its polling
    Video,
    /// Soundtrack
    Music,
}

/// Storyboard-wide image settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSettings {
    /// Aspect ratio of every generated image
    pub aspect_ratio: AspectRatio,
    /// Style text inserted into every image prompt
    pub style_prompt: String,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::default(),
            style_prompt: STYLE_PRESETS[0].prompt.to_string(),
        }
    }
}

/// Snapshot of a panel after an update was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEvent {
    /// The panel as it stood right after the update
    pub panel: Panel,
}

struct BoardInner {
    title: String,
    logline: String,
    panels: RwLock<Vec<Panel>>,
    settings: RwLock<BoardSettings>,
    busy: Mutex<HashSet<(String, Operation)>>,
    events: broadcast::Sender<PanelEvent>,
}

/// Panels of one story, shared by every controller working on them.
///
/// Updates are applied per field under a short synchronous lock, so concurrent
/// operations on one panel resolve as last write wins. Every applied update is
/// broadcast as a [`PanelEvent`].
#[derive(Clone)]
pub struct Storyboard {
    inner: Arc<BoardInner>,
}

impl std::fmt::Debug for Storyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storyboard")
            .field("title", &self.inner.title)
            .field("panels", &self.len())
            .finish_non_exhaustive()
    }
}

impl Storyboard {
    /// Board over existing panels.
    pub fn new(
        title: impl Into<String>,
        logline: impl Into<String>,
        panels: Vec<Panel>,
        settings: BoardSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(BoardInner {
                title: title.into(),
                logline: logline.into(),
                panels: RwLock::new(panels),
                settings: RwLock::new(settings),
                busy: Mutex::new(HashSet::new()),
                events,
            }),
        }
    }

    /// One pending panel per scene of `structure`.
    pub fn from_structure(structure: &StoryStructure, settings: BoardSettings) -> Self {
        debug!(scenes = structure.scenes.len(), "Seeding storyboard");
        Self::new(
            structure.title.clone(),
            structure.logline.clone(),
            structure.to_panels(),
            settings,
        )
    }

    /// Story title.
    pub fn title(&self) -> &str {
        &self.inner.title
    }

    /// Story logline.
    pub fn logline(&self) -> &str {
        &self.inner.logline
    }

    /// Receive a snapshot after every applied update.
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.inner.events.subscribe()
    }

    /// Snapshot of every panel in scene order.
    pub fn panels(&self) -> Vec<Panel> {
        self.read_panels().clone()
    }

    /// Snapshot of one panel.
    pub fn panel(&self, id: &str) -> Option<Panel> {
        self.read_panels().iter().find(|panel| panel.id == id).cloned()
    }

    /// Number of panels.
    pub fn len(&self) -> usize {
        self.read_panels().len()
    }

    /// Whether the board has no panels.
    pub fn is_empty(&self) -> bool {
        self.read_panels().is_empty()
    }

    /// Whether every panel reached `complete`.
    pub fn all_complete(&self) -> bool {
        let panels = self.read_panels();
        !panels.is_empty() && panels.iter().all(Panel::is_complete)
    }

    /// Current image settings.
    pub fn settings(&self) -> BoardSettings {
        self.inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the aspect ratio used by later image requests.
    pub fn set_aspect_ratio(&self, aspect_ratio: AspectRatio) {
        self.write_settings().aspect_ratio = aspect_ratio;
    }

    /// Replace the global style text.
    pub fn set_style_prompt(&self, style_prompt: impl Into<String>) {
        self.write_settings().style_prompt = style_prompt.into();
    }

    /// Use a preset's style text.
    pub fn apply_preset(&self, preset: StylePreset) {
        self.set_style_prompt(preset.prompt);
    }

    /// Apply `change` to one panel and broadcast the result.
    ///
    /// When `change` fails, nothing is broadcast; callers keep the panel
    /// untouched by validating before mutating.
    pub fn update<F, R>(&self, id: &str, change: F) -> Result<R, StudioError>
    where
        F: FnOnce(&mut Panel) -> Result<R, StudioError>,
    {
        let snapshot;
        let result = {
            let mut panels = self
                .inner
                .panels
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let panel = panels
                .iter_mut()
                .find(|panel| panel.id == id)
                .ok_or_else(|| StudioError::new(StudioErrorKind::PanelNotFound(id.to_string())))?;
            let result = change(panel)?;
            snapshot = panel.clone();
            result
        };

        trace!(panel_id = %id, status = %snapshot.status, "Panel updated");
        // No subscribers is fine.
        let _ = self.inner.events.send(PanelEvent { panel: snapshot });
        Ok(result)
    }

    /// Mark `operation` as running on `panel_id` until the guard drops.
    pub(crate) fn acquire(
        &self,
        panel_id: &str,
        operation: Operation,
    ) -> Result<BusyGuard, StudioError> {
        let key = (panel_id.to_string(), operation);
        let mut busy = self
            .inner
            .busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(key.clone()) {
            return Err(StudioError::new(StudioErrorKind::Busy {
                panel: panel_id.to_string(),
                operation: operation.to_string(),
            }));
        }
        Ok(BusyGuard {
            board: self.clone(),
            key,
        })
    }

    /// Whether `operation` is running on `panel_id`.
    pub fn is_busy(&self, panel_id: &str, operation: Operation) -> bool {
        self.inner
            .busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(panel_id.to_string(), operation))
    }

    fn read_panels(&self) -> std::sync::RwLockReadGuard<'_, Vec<Panel>> {
        self.inner
            .panels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_settings(&self) -> std::sync::RwLockWriteGuard<'_, BoardSettings> {
        self.inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases a busy flag on drop.
#[derive(Debug)]
pub(crate) struct BusyGuard {
    board: Storyboard,
    key: (String, Operation),
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.board
            .inner
            .busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
