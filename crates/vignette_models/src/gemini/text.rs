//! Post-processing for text responses.

use serde_json::{Value, json};
use tracing::warn;
use vignette_core::StoryStructure;
use vignette_error::{StudioError, StudioErrorKind, VignetteResult};

/// Response schema requested for outlines.
pub fn outline_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "logline": {"type": "STRING"},
            "scenes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {"type": "STRING"},
                        "description": {"type": "STRING"}
                    }
                }
            }
        }
    })
}

/// Parse an outline response, tolerating a fenced ```json block.
///
/// Unparseable JSON and outlines without scenes are both reported as
/// [`StudioErrorKind::InvalidStructure`].
///
/// # Examples
///
/// ```
/// use vignette_models::parse_outline;
///
/// let story = parse_outline("```json\n{\"title\":\"T\",\"logline\":\"L\",\"scenes\":[{\"title\":\"A\",\"description\":\"B\"}]}\n```").unwrap();
/// assert_eq!(story.scenes.len(), 1);
/// assert!(parse_outline("{\"title\":\"T\",\"scenes\":[]}").is_err());
/// ```
pub fn parse_outline(text: &str) -> VignetteResult<StoryStructure> {
    let body = strip_code_fence(text.trim());
    let story: StoryStructure = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Outline response is not valid JSON");
        StudioError::new(StudioErrorKind::InvalidStructure)
    })?;
    story.validate()?;
    Ok(story)
}

/// Strip quote characters and surrounding whitespace from an image prompt.
pub fn clean_image_prompt(text: &str) -> String {
    text.replace(['"', '\''], "").trim().to_string()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
