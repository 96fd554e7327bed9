//! Outline command handler.

use std::sync::Arc;
use tracing::info;
use vignette::{
    GeminiClient, JsonError, Language, Services, SimulatedMusicGenerator, StudioSession,
    VignetteConfig, VignetteResult, outline_text,
};

/// Session wired to the Gemini backends and the simulated music generator.
pub fn new_session(
    config: &VignetteConfig,
    language: Option<Language>,
) -> VignetteResult<StudioSession> {
    let client = Arc::new(GeminiClient::new(config)?);
    let music = Arc::new(SimulatedMusicGenerator::from_settings(&config.studio));
    let session = StudioSession::new(Services::from_client(client, music), config.studio.clone());
    if let Some(language) = language {
        session.switch_language(language);
    }
    info!(language = %session.language(), "Session started");
    Ok(session)
}

/// Print the outline for `idea`.
pub async fn generate_outline(
    config: &VignetteConfig,
    idea: &str,
    language: Option<Language>,
    json: bool,
) -> VignetteResult<()> {
    let mut session = new_session(config, language)?;
    let structure = session.submit_idea(idea).await?;

    if json {
        let text = serde_json::to_string_pretty(&structure)
            .map_err(|e| JsonError::new(format!("Failed to serialize outline: {}", e)))?;
        println!("{}", text);
    } else {
        println!("{}", outline_text(&structure));
    }
    Ok(())
}
