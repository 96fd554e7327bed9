//! REST data transfer objects for Imagen, Veo and speech synthesis.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use vignette_core::{AspectRatio, ReferenceImage, Voice};

//
// ─── IMAGEN ─────────────────────────────────────────────────────────────────────
//

/// Imagen `:predict` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ImagenRequest {
    instances: Vec<PromptInstance>,
    parameters: ImagenParameters,
}

impl ImagenRequest {
    /// Single-image request.
    pub fn new(prompt: &str, parameters: ImagenParameters) -> Self {
        Self {
            instances: vec![PromptInstance {
                prompt: prompt.to_string(),
                image: None,
            }],
            parameters,
        }
    }
}

/// Imagen generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct ImagenParameters {
    /// Number of images
    #[builder(default = "1")]
    sample_count: u32,
    /// Output aspect ratio
    #[builder(default)]
    aspect_ratio: AspectRatio,
    /// Output encoding
    #[builder(default = "\"image/jpeg\".to_string()")]
    output_mime_type: String,
}

impl ImagenParameters {
    /// Creates a new builder for `ImagenParameters`.
    pub fn builder() -> ImagenParametersBuilder {
        ImagenParametersBuilder::default()
    }
}

/// Imagen `:predict` response body.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct ImagenResponse {
    #[serde(default)]
    predictions: Vec<ImagenPrediction>,
}

/// One predicted image, in any of the shapes the endpoint returns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenPrediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    image: Option<GeneratedImage>,
    #[serde(default)]
    generated_image: Option<GeneratedImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedImage {
    #[serde(default)]
    image_bytes: Option<String>,
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl ImagenResponse {
    /// Base64 payload and MIME type of the first image, if any.
    pub fn first_image(&self) -> Option<(&str, Option<&str>)> {
        self.predictions.iter().find_map(|prediction| {
            if let Some(encoded) = prediction.bytes_base64_encoded.as_deref() {
                return Some((encoded, prediction.mime_type.as_deref()));
            }
            let nested = prediction
                .image
                .as_ref()
                .or(prediction.generated_image.as_ref())?;
            let encoded = nested
                .image_bytes
                .as_deref()
                .or(nested.bytes_base64_encoded.as_deref())?;
            Some((encoded, nested.mime_type.as_deref()))
        })
    }
}

//
// ─── VEO ────────────────────────────────────────────────────────────────────────
//

/// Veo `:predictLongRunning` request body.
#[derive(Debug, Clone, Serialize)]
pub struct VeoRequest {
    instances: Vec<PromptInstance>,
    parameters: VeoParameters,
}

impl VeoRequest {
    /// Single-video request, optionally conditioned on an image.
    pub fn new(prompt: &str, image: Option<&ReferenceImage>) -> Self {
        Self {
            instances: vec![PromptInstance {
                prompt: prompt.to_string(),
                image: image.map(InlineImage::from),
            }],
            parameters: VeoParameters { sample_count: 1 },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct VeoParameters {
    sample_count: u32,
}

#[derive(Debug, Clone, Serialize)]
struct PromptInstance {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<InlineImage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineImage {
    bytes_base64_encoded: String,
    mime_type: String,
}

impl From<&ReferenceImage> for InlineImage {
    fn from(image: &ReferenceImage) -> Self {
        use base64::Engine;
        Self {
            bytes_base64_encoded: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
            mime_type: image.mime_type.clone(),
        }
    }
}

//
// ─── SPEECH ─────────────────────────────────────────────────────────────────────
//

/// `generateContent` request asking for audio output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    contents: Vec<SpeechContent>,
    generation_config: SpeechGenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct SpeechContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechGenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

impl SpeechRequest {
    /// Request `text` spoken by `voice`.
    pub fn new(text: &str, voice: Voice) -> Self {
        Self {
            contents: vec![SpeechContent {
                parts: vec![TextPart {
                    text: text.to_string(),
                }],
            }],
            generation_config: SpeechGenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.to_string(),
                        },
                    },
                },
            },
        }
    }
}

/// `generateContent` response carrying inline audio.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    data: String,
}

impl SpeechResponse {
    /// Base64 PCM of the first inline-data part of the first candidate.
    pub fn audio_data(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .map(|inline| inline.data.as_str())
            .filter(|data| !data.is_empty())
    }
}

//
// ─── ERRORS ─────────────────────────────────────────────────────────────────────
//

/// Google API error envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl ApiErrorEnvelope {
    /// Message from an error body, falling back to the raw text.
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .map(|error| error.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| body.trim().to_string())
    }
}
