//! Google Gemini API implementation.
//!
//! [`GeminiClient`] covers every request/response capability the studio uses:
//! - Text (outline, streamed script, image prompt, writing assistant) through `gemini-rust`
//! - Imagen still images through the REST `:predict` endpoint
//! - Veo video through `:predictLongRunning` plus operation polling
//! - Speech synthesis through `generateContent` with audio output
//!
//! # Example
//!
//! ```no_run
//! use vignette_core::VignetteConfig;
//! use vignette_interface::StoryWriter;
//! use vignette_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VignetteConfig::load()?;
//! let client = GeminiClient::new(&config)?;
//! let story = client
//!     .generate_outline("A lighthouse keeper befriends a whale", "Outline: {{idea}}")
//!     .await?;
//! println!("{} ({} scenes)", story.title, story.scenes.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::{StreamExt, TryStreamExt};
use gemini_rust::{Gemini, client::Model};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use tracing::{debug, info, instrument};

use vignette_core::{
    AspectRatio, ModelConfig, PcmFormat, StoryStructure, VideoOperation, VideoRequest,
    VignetteConfig, Voice, render_template, wav_data_url,
};
use vignette_error::{
    GeminiError, GeminiErrorKind, HttpError, JsonError, VignetteError, VignetteResult,
};
use vignette_interface::{
    ImageGenerator, SpeechSynthesizer, StoryWriter, TextStream, VideoGenerator,
};

use super::GeminiResult;
use super::dto::{
    ApiErrorEnvelope, ImagenParameters, ImagenRequest, ImagenResponse, SpeechRequest,
    SpeechResponse, VeoRequest,
};
use super::text::{clean_image_prompt, outline_schema, parse_outline};

/// Client for the Gemini family of generation APIs.
#[derive(Clone)]
pub struct GeminiClient {
    /// SDK client bound to the text model
    text: Gemini,
    /// Plain HTTP client for the REST-only endpoints
    http: reqwest::Client,
    api_key: String,
    models: ModelConfig,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("models", &self.models)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client, reading the API key from `GEMINI_API_KEY`.
    #[instrument(name = "gemini_client_new", skip(config))]
    pub fn new(config: &VignetteConfig) -> VignetteResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key.
    #[instrument(name = "gemini_client_with_api_key", skip(api_key, config))]
    pub fn with_api_key(api_key: impl Into<String>, config: &VignetteConfig) -> VignetteResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into());
        }

        let text = Gemini::with_model(&api_key, Self::model_name_to_enum(&config.models.text))
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        info!(text_model = %config.models.text, "Gemini client ready");

        Ok(Self {
            text,
            http,
            api_key,
            models: config.models.clone(),
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Model names this client was configured with.
    pub fn models(&self) -> &ModelConfig {
        &self.models
    }

    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// - "gemini-2.5-flash" → Model::Gemini25Flash
    /// - "gemini-2.0-flash" → Model::Custom("models/gemini-2.0-flash")
    /// - "models/gemini-2.0-flash" → Model::Custom("models/gemini-2.0-flash") (preserved)
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other if other.starts_with("models/") => Model::Custom(other.to_string()),
            other => Model::Custom(format!("models/{}", other)),
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url,
            model.trim_start_matches("models/"),
            method
        )
    }

    /// Single-turn text request, trimmed.
    async fn generate_text(&self, prompt: &str) -> GeminiResult<String> {
        let response = self
            .text
            .generate_content()
            .with_user_message(prompt)
            .execute()
            .await
            .map_err(Self::parse_gemini_error)?;
        Ok(response.text().trim().to_string())
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> VignetteResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(url, "POST");
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request to {} failed: {}", url, e)))?;
        Self::read_json(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> VignetteResult<R> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request to {} failed: {}", url, e)))?;
        Self::read_json(response).await
    }

    async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> VignetteResult<R> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message: ApiErrorEnvelope::message_from(&body),
            })
            .into());
        }

        serde_json::from_str(&body).map_err(|e| {
            VignetteError::from(JsonError::new(format!("Failed to parse response: {}", e)))
        })
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    fn parse_gemini_error(err: impl std::fmt::Display) -> GeminiError {
        let err_msg = err.to_string();

        // Example: "bad response from server; code 503; description: ..."
        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            GeminiError::new(GeminiErrorKind::HttpError {
                status_code,
                message: err_msg,
            })
        } else {
            GeminiError::new(GeminiErrorKind::ApiRequest(err_msg))
        }
    }

    fn extract_status_code(error_msg: &str) -> Option<u16> {
        let code_start = error_msg.find("code ")?;
        let code_str = &error_msg[code_start + 5..];
        let end = code_str
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(code_str.len());
        code_str[..end].parse().ok()
    }
}

#[async_trait]
impl StoryWriter for GeminiClient {
    #[instrument(skip(self, template), fields(model = %self.models.text))]
    async fn generate_outline(&self, idea: &str, template: &str) -> VignetteResult<StoryStructure> {
        let prompt = render_template(template, &[("idea", idea)]);
        let response = self
            .text
            .generate_content()
            .with_user_message(&prompt)
            .with_response_mime_type("application/json")
            .with_response_schema(outline_schema())
            .execute()
            .await
            .map_err(Self::parse_gemini_error)?;

        let story = parse_outline(&response.text())?;
        info!(title = %story.title, scenes = story.scenes.len(), "Outline generated");
        Ok(story)
    }

    #[instrument(skip(self, scene_description, template), fields(model = %self.models.text))]
    async fn stream_script(
        &self,
        scene_description: &str,
        template: &str,
    ) -> VignetteResult<TextStream> {
        let prompt = render_template(template, &[("sceneDescription", scene_description)]);
        let gemini_stream = self
            .text
            .generate_content()
            .with_user_message(&prompt)
            .execute_stream()
            .await
            .map_err(Self::parse_gemini_error)?;

        let text_stream = gemini_stream.into_stream().map(|result| match result {
            Ok(response) => Ok(response.text()),
            Err(e) => Err(VignetteError::from(GeminiError::new(
                GeminiErrorKind::StreamInterrupted(e.to_string()),
            ))),
        });

        Ok(Box::pin(text_stream))
    }

    #[instrument(skip(self, script, template), fields(model = %self.models.text))]
    async fn generate_image_prompt(
        &self,
        script: &str,
        style_prompt: &str,
        template: &str,
    ) -> VignetteResult<String> {
        let prompt = render_template(
            template,
            &[("script", script), ("globalStylePrompt", style_prompt)],
        );
        let text = self.generate_text(&prompt).await?;
        Ok(clean_image_prompt(&text))
    }

    #[instrument(skip_all)]
    async fn rewrite(&self, text: &str, template: &str) -> VignetteResult<String> {
        Ok(self
            .generate_text(&render_template(template, &[("text", text)]))
            .await?)
    }

    #[instrument(skip_all)]
    async fn expand(&self, text: &str, template: &str) -> VignetteResult<String> {
        Ok(self
            .generate_text(&render_template(template, &[("text", text)]))
            .await?)
    }

    #[instrument(skip_all)]
    async fn shrink(&self, text: &str, template: &str) -> VignetteResult<String> {
        Ok(self
            .generate_text(&render_template(template, &[("text", text)]))
            .await?)
    }

    #[instrument(skip(self, text, template))]
    async fn change_tone(
        &self,
        text: &str,
        tone: &str,
        template: &str,
    ) -> VignetteResult<String> {
        let prompt = render_template(template, &[("text", text), ("tone", tone)]);
        Ok(self.generate_text(&prompt).await?)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.models.image))]
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> VignetteResult<String> {
        let parameters = ImagenParameters::builder()
            .aspect_ratio(aspect_ratio)
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;
        let request = ImagenRequest::new(prompt, parameters);

        let response: ImagenResponse = self
            .post_json(&self.endpoint(&self.models.image, "predict"), &request)
            .await?;

        let (encoded, mime_type) = response.first_image().ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::MissingPayload(
                "Imagen returned no images".to_string(),
            ))
        })?;

        Ok(format!(
            "data:{};base64,{}",
            mime_type.unwrap_or("image/jpeg"),
            encoded
        ))
    }
}

#[async_trait]
impl VideoGenerator for GeminiClient {
    #[instrument(skip(self, prompt, request), fields(model))]
    async fn start_video_generation(
        &self,
        prompt: &str,
        request: &VideoRequest,
    ) -> VignetteResult<VideoOperation> {
        let model = request.model.as_deref().unwrap_or(&self.models.video);
        tracing::Span::current().record("model", model);

        let body = VeoRequest::new(prompt, request.image.as_ref());
        let operation: VideoOperation = self
            .post_json(&self.endpoint(model, "predictLongRunning"), &body)
            .await?;

        info!(operation = %operation.name, "Video generation started");
        Ok(operation)
    }

    #[instrument(skip(self), fields(operation = %operation.name))]
    async fn check_video_status(
        &self,
        operation: &VideoOperation,
    ) -> VignetteResult<VideoOperation> {
        let url = format!("{}/{}", self.base_url, operation.name);
        let latest: VideoOperation = self.get_json(&url).await?;
        debug!(done = latest.done, "Video operation polled");
        Ok(latest)
    }

    fn authorize_video_uri(&self, uri: &str) -> String {
        authorize_uri(uri, &self.api_key)
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiClient {
    #[instrument(skip(self, text, template), fields(model = %self.models.tts, voice = %voice))]
    async fn generate_speech(
        &self,
        text: &str,
        voice: Voice,
        template: &str,
    ) -> VignetteResult<String> {
        let prompt = render_template(template, &[("text", text)]);
        let request = SpeechRequest::new(&prompt, voice);

        let response: SpeechResponse = self
            .post_json(&self.endpoint(&self.models.tts, "generateContent"), &request)
            .await?;

        let encoded = response.audio_data().ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::MissingPayload(
                "No audio data returned from API.".to_string(),
            ))
        })?;

        let pcm = STANDARD
            .decode(encoded)
            .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;

        debug!(bytes = pcm.len(), "Narration synthesized");
        Ok(wav_data_url(&pcm, PcmFormat::SPEECH)?)
    }
}

/// Append the API key to a download URI.
pub(crate) fn authorize_uri(uri: &str, api_key: &str) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}key={}", uri, separator, api_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_appends_to_existing_query() {
        assert_eq!(
            authorize_uri("https://files/v.mp4?alt=media", "k1"),
            "https://files/v.mp4?alt=media&key=k1"
        );
        assert_eq!(
            authorize_uri("https://files/v.mp4", "k1"),
            "https://files/v.mp4?key=k1"
        );
    }

    #[test]
    fn status_code_extraction() {
        assert_eq!(
            GeminiClient::extract_status_code("bad response from server; code 503; description"),
            Some(503)
        );
        assert_eq!(GeminiClient::extract_status_code("code 429"), Some(429));
        assert_eq!(GeminiClient::extract_status_code("timeout"), None);
    }

    #[test]
    fn parsed_errors_keep_status() {
        let err = GeminiClient::parse_gemini_error("bad response; code 429; quota");
        assert_eq!(err.kind.status_code(), Some(429));
        let err = GeminiClient::parse_gemini_error("connection reset");
        assert!(matches!(err.kind, GeminiErrorKind::ApiRequest(_)));
    }

    #[test]
    fn endpoints_strip_models_prefix() -> anyhow::Result<()> {
        let config = VignetteConfig::bundled()?;
        let client = GeminiClient::with_api_key("test-key", &config)?;
        assert_eq!(
            client.endpoint("models/veo-2.0-generate-001", "predictLongRunning"),
            "https://generativelanguage.googleapis.com/v1beta/models/veo-2.0-generate-001:predictLongRunning"
        );
        assert_eq!(
            client.authorize_video_uri("https://v/1?alt=media"),
            "https://v/1?alt=media&key=test-key"
        );
        Ok(())
    }

    #[test]
    fn blank_api_key_is_rejected() -> anyhow::Result<()> {
        let config = VignetteConfig::bundled()?;
        let err = GeminiClient::with_api_key("  ", &config).unwrap_err();
        assert!(err.user_message().contains("GEMINI_API_KEY"));
        Ok(())
    }
}
