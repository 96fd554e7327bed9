//! Types shared by the live music traits.

use serde::{Deserialize, Serialize};

/// Text prompt with a relative influence on live music.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPrompt {
    /// Prompt text
    pub text: String,
    /// Relative weight, 1.0 by default
    pub weight: f32,
}

impl WeightedPrompt {
    /// Prompt with the default weight.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: 1.0,
        }
    }
}

/// Live music generation parameters. Unset fields keep the server's value.
///
/// # Examples
///
/// ```
/// use vignette_interface::MusicConfig;
///
/// let config = MusicConfig::builder().bpm(90u32).density(0.4f32).build().unwrap();
/// assert_eq!(config.bpm, Some(90));
/// assert!(config.temperature.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(into, strip_option))]
#[serde(rename_all = "camelCase")]
pub struct MusicConfig {
    /// Beats per minute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Note density, 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<f32>,
    /// Tonal brightness, 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// Prompt adherence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<f32>,
}

impl MusicConfig {
    /// Creates a new config builder.
    pub fn builder() -> MusicConfigBuilder {
        MusicConfigBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        let config = MusicConfig::builder().guidance(4.0f32).build().unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"guidance": 4.0}));
    }

    #[test]
    fn weighted_prompt_defaults_to_full_weight() {
        assert_eq!(WeightedPrompt::new("lofi piano").weight, 1.0);
    }
}
