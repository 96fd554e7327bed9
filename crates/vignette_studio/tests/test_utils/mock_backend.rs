//! Mock generation backend with scripted responses and call counting.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use vignette_core::{
    AspectRatio, OperationError, StoryStructure, VideoOperation, VideoRequest, Voice,
};
use vignette_error::{GeminiError, GeminiErrorKind, VignetteError, VignetteResult};
use vignette_interface::{
    ImageGenerator, MusicGenerator, SpeechSynthesizer, StoryWriter, TextStream, VideoGenerator,
};

use super::sample_structure;

/// Backend request kinds, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Outline,
    Script,
    ImagePrompt,
    Image,
    Rewrite,
    Expand,
    Shrink,
    ChangeTone,
    VideoStart,
    VideoPoll,
    Speech,
    Music,
}

/// Scripted answer to one video status poll.
#[derive(Debug, Clone)]
pub enum MockPoll {
    /// Still running
    Pending,
    /// Finished with a video at this URI
    Done(String),
    /// Finished with a service error message
    Failed(String),
    /// Finished without a video
    Empty,
    /// The poll request itself failed
    RequestError(String),
}

/// Mock backend implementing every request/response capability.
///
/// Responses are deterministic; failures and delays are opt-in.
pub struct MockStudioBackend {
    outline: StoryStructure,
    fragments: Vec<String>,
    fragment_delay: Duration,
    image_delay: Duration,
    failing: HashSet<MockCall>,
    polls: Mutex<VecDeque<MockPoll>>,
    calls: Mutex<HashMap<MockCall, usize>>,
    templates: Mutex<HashMap<MockCall, String>>,
    video_requests: Mutex<Vec<VideoRequest>>,
}

impl Default for MockStudioBackend {
    fn default() -> Self {
        Self {
            outline: sample_structure(),
            fragments: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            fragment_delay: Duration::ZERO,
            image_delay: Duration::ZERO,
            failing: HashSet::new(),
            polls: Mutex::new(VecDeque::new()),
            calls: Mutex::new(HashMap::new()),
            templates: Mutex::new(HashMap::new()),
            video_requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockStudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outline(mut self, outline: StoryStructure) -> Self {
        self.outline = outline;
        self
    }

    pub fn with_fragments(mut self, fragments: &[&str]) -> Self {
        self.fragments = fragments.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Wait before each script fragment.
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = delay;
        self
    }

    /// Wait before answering image requests.
    pub fn with_image_delay(mut self, delay: Duration) -> Self {
        self.image_delay = delay;
        self
    }

    pub fn failing(mut self, call: MockCall) -> Self {
        self.failing.insert(call);
        self
    }

    pub fn with_polls(self, polls: Vec<MockPoll>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    /// Number of requests of kind `call`.
    pub fn calls(&self, call: MockCall) -> usize {
        self.calls.lock().unwrap().get(&call).copied().unwrap_or(0)
    }

    /// Template passed with the last request of kind `call`.
    pub fn last_template(&self, call: MockCall) -> Option<String> {
        self.templates.lock().unwrap().get(&call).cloned()
    }

    pub fn video_requests(&self) -> Vec<VideoRequest> {
        self.video_requests.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall, template: Option<&str>) -> VignetteResult<()> {
        *self.calls.lock().unwrap().entry(call).or_insert(0) += 1;
        if let Some(template) = template {
            self.templates
                .lock()
                .unwrap()
                .insert(call, template.to_string());
        }
        if self.failing.contains(&call) {
            return Err(mock_error(&format!("{:?} unavailable", call)));
        }
        Ok(())
    }
}

fn mock_error(message: &str) -> VignetteError {
    GeminiError::new(GeminiErrorKind::ApiRequest(message.to_string())).into()
}

#[async_trait]
impl StoryWriter for MockStudioBackend {
    async fn generate_outline(&self, _idea: &str, template: &str) -> VignetteResult<StoryStructure> {
        self.record(MockCall::Outline, Some(template))?;
        Ok(self.outline.clone())
    }

    async fn stream_script(
        &self,
        _scene_description: &str,
        template: &str,
    ) -> VignetteResult<TextStream> {
        self.record(MockCall::Script, Some(template))?;
        let fragments = self.fragments.clone();
        let delay = self.fragment_delay;
        let stream = async_stream::stream! {
            for fragment in fragments {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(fragment);
            }
        };
        Ok(Box::pin(stream))
    }

    async fn generate_image_prompt(
        &self,
        script: &str,
        style_prompt: &str,
        template: &str,
    ) -> VignetteResult<String> {
        self.record(MockCall::ImagePrompt, Some(template))?;
        Ok(format!("{} | {}", script, style_prompt))
    }

    async fn rewrite(&self, text: &str, template: &str) -> VignetteResult<String> {
        self.record(MockCall::Rewrite, Some(template))?;
        Ok(format!("rewritten: {}", text))
    }

    async fn expand(&self, text: &str, template: &str) -> VignetteResult<String> {
        self.record(MockCall::Expand, Some(template))?;
        Ok(format!("expanded: {}", text))
    }

    async fn shrink(&self, text: &str, template: &str) -> VignetteResult<String> {
        self.record(MockCall::Shrink, Some(template))?;
        Ok(format!("shrunk: {}", text))
    }

    async fn change_tone(&self, text: &str, tone: &str, template: &str) -> VignetteResult<String> {
        self.record(MockCall::ChangeTone, Some(template))?;
        Ok(format!("{}: {}", tone, text))
    }
}

#[async_trait]
impl ImageGenerator for MockStudioBackend {
    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> VignetteResult<String> {
        if !self.image_delay.is_zero() {
            tokio::time::sleep(self.image_delay).await;
        }
        self.record(MockCall::Image, None)?;
        Ok(format!(
            "data:image/jpeg;base64,{}",
            prompt.len() + aspect_ratio.to_string().len()
        ))
    }
}

#[async_trait]
impl VideoGenerator for MockStudioBackend {
    async fn start_video_generation(
        &self,
        _prompt: &str,
        request: &VideoRequest,
    ) -> VignetteResult<VideoOperation> {
        self.record(MockCall::VideoStart, None)?;
        self.video_requests.lock().unwrap().push(request.clone());
        Ok(VideoOperation::pending("models/veo-mock/operations/op-1"))
    }

    async fn check_video_status(&self, operation: &VideoOperation) -> VignetteResult<VideoOperation> {
        self.record(MockCall::VideoPoll, None)?;
        let next = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockPoll::Pending);

        let mut latest = VideoOperation::pending(operation.name.clone());
        match next {
            MockPoll::Pending => {}
            MockPoll::Done(uri) => {
                latest.done = true;
                latest.response = Some(serde_json::json!({
                    "generateVideoResponse": {"generatedSamples": [{"video": {"uri": uri}}]}
                }));
            }
            MockPoll::Failed(message) => {
                latest.done = true;
                latest.error = Some(OperationError { code: 8, message });
            }
            MockPoll::Empty => latest.done = true,
            MockPoll::RequestError(message) => return Err(mock_error(&message)),
        }
        Ok(latest)
    }

    fn authorize_video_uri(&self, uri: &str) -> String {
        let separator = if uri.contains('?') { '&' } else { '?' };
        format!("{}{}key=test-key", uri, separator)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockStudioBackend {
    async fn generate_speech(&self, text: &str, voice: Voice, template: &str) -> VignetteResult<String> {
        self.record(MockCall::Speech, Some(template))?;
        Ok(format!("data:audio/wav;base64,{}-{}", voice, text.len()))
    }
}

#[async_trait]
impl MusicGenerator for MockStudioBackend {
    async fn generate_music(&self, prompt: &str, template: &str) -> VignetteResult<String> {
        self.record(MockCall::Music, Some(template))?;
        Ok(format!("data:audio/wav;base64,{}", prompt.len()))
    }
}
