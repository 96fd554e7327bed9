//! Runtime configuration.
//!
//! Settings load with a precedence system:
//! - Bundled defaults (include_str! from vignette.toml)
//! - User overrides (~/.config/vignette/vignette.toml, then ./vignette.toml)
//! - Later sources win, key by key

use crate::{AspectRatio, Language, Voice};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use vignette_error::{ConfigError, VignetteError, VignetteResult};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../vignette.toml");

/// Model names for each generation capability.
///
/// ```toml
/// [models]
/// text = "gemini-2.5-flash"
/// video_choices = ["veo-3.0-generate-preview", "veo-2.0-generate-001"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Outline, script, prompt and writing-assistant requests
    pub text: String,
    /// Still images
    pub image: String,
    /// Default video model
    pub video: String,
    /// Speech synthesis
    pub tts: String,
    /// Live music sessions
    pub music: String,
    /// Video models offered for selection
    #[serde(default)]
    pub video_choices: Vec<String>,
}

/// Service endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// REST base URL, without trailing slash
    pub base_url: String,
    /// WebSocket endpoint for live music
    pub live_music_url: String,
}

/// Timing and default choices for the studio.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vignette_core::StudioSettings;
///
/// let settings = StudioSettings::builder()
///     .video_poll_interval_secs(2u64)
///     .build()
///     .unwrap();
/// assert_eq!(settings.video_poll_interval(), Duration::from_secs(2));
/// assert_eq!(*settings.video_message_interval_secs(), 4);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default, setter(into))]
pub struct StudioSettings {
    /// Seconds between video status polls
    video_poll_interval_secs: u64,
    /// Seconds between rotating progress messages
    video_message_interval_secs: u64,
    /// Delay of the simulated music generator
    simulated_music_delay_secs: u64,
    /// Default narration voice
    default_voice: Voice,
    /// Default storyboard aspect ratio
    default_aspect_ratio: AspectRatio,
    /// Initial prompt language
    language: Language,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            video_poll_interval_secs: 10,
            video_message_interval_secs: 4,
            simulated_music_delay_secs: 3,
            default_voice: Voice::default(),
            default_aspect_ratio: AspectRatio::default(),
            language: Language::default(),
        }
    }
}

impl StudioSettings {
    /// Creates a new settings builder seeded with the defaults.
    pub fn builder() -> StudioSettingsBuilder {
        StudioSettingsBuilder::default()
    }

    /// Interval between video status polls.
    pub fn video_poll_interval(&self) -> Duration {
        Duration::from_secs(self.video_poll_interval_secs)
    }

    /// Interval between progress messages.
    pub fn video_message_interval(&self) -> Duration {
        Duration::from_secs(self.video_message_interval_secs)
    }

    /// Delay of the simulated music generator.
    pub fn simulated_music_delay(&self) -> Duration {
        Duration::from_secs(self.simulated_music_delay_secs)
    }
}

/// Top-level Vignette configuration.
///
/// # Example
///
/// ```no_run
/// use vignette_core::VignetteConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VignetteConfig::load()?;
/// println!("Text model: {}", config.models.text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VignetteConfig {
    /// Model names
    pub models: ModelConfig,
    /// Endpoints
    pub api: ApiConfig,
    /// Studio behaviour
    pub studio: StudioSettings,
}

impl VignetteConfig {
    /// Bundled defaults only, ignoring user files.
    pub fn bundled() -> VignetteResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VignetteResult<Self> {
        debug!("Loading configuration from file");
        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped when absent.
    #[instrument]
    pub fn load() -> VignetteResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vignette/vignette.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("vignette").required(false));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> VignetteResult<Self> {
        builder
            .build()
            .map_err(|e| {
                VignetteError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VignetteError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
