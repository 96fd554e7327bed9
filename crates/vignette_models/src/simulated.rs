//! Stand-in music generator used for per-panel soundtracks.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};
use vignette_core::{SILENT_WAV_DATA_URL, StudioSettings, render_template};
use vignette_error::VignetteResult;
use vignette_interface::MusicGenerator;

/// Waits a fixed delay and returns a silent WAV clip.
///
/// The rendered prompt is logged but otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedMusicGenerator {
    delay: Duration,
}

impl SimulatedMusicGenerator {
    /// Generator with an explicit delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Generator using the configured delay.
    pub fn from_settings(settings: &StudioSettings) -> Self {
        Self::new(settings.simulated_music_delay())
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedMusicGenerator {
    fn default() -> Self {
        Self::from_settings(&StudioSettings::default())
    }
}

#[async_trait]
impl MusicGenerator for SimulatedMusicGenerator {
    #[instrument(skip(self, template), fields(delay_ms = self.delay.as_millis() as u64))]
    async fn generate_music(&self, prompt: &str, template: &str) -> VignetteResult<String> {
        let rendered = render_template(template, &[("prompt", prompt)]);
        info!(prompt = %rendered, "Simulating music generation");
        tokio::time::sleep(self.delay).await;
        Ok(SILENT_WAV_DATA_URL.to_string())
    }
}
