//! Long-running video job types.

use serde::{Deserialize, Serialize};

/// Status messages cycled while a video renders.
pub const GENERATION_MESSAGES: [&str; 9] = [
    "Warming up the director's chair...",
    "Scouting for the perfect digital location...",
    "Casting virtual actors...",
    "Adjusting the lighting rig...",
    "Rolling the virtual cameras...",
    "Processing dailies, this can take a few minutes...",
    "In the editing room, splicing scenes...",
    "Adding special effects and sound...",
    "Rendering the final cut, almost there...",
];

/// Status message shown once a video is ready.
pub const VIDEO_SUCCESS_MESSAGE: &str = "Success!";

/// Error reported by the service inside a finished operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// Service status code
    #[serde(default)]
    pub code: i32,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

/// Opaque handle to a running video job, re-submitted on every poll.
///
/// # Examples
///
/// ```
/// use vignette_core::VideoOperation;
///
/// let op: VideoOperation = serde_json::from_str(r#"{
///     "name": "operations/abc",
///     "done": true,
///     "response": {"generatedVideos": [{"video": {"uri": "https://v/1?alt=media"}}]}
/// }"#).unwrap();
/// assert_eq!(op.video_uri(), Some("https://v/1?alt=media"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoOperation {
    /// Operation resource name
    pub name: String,
    /// Whether the job has finished
    #[serde(default)]
    pub done: bool,
    /// Failure reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    /// Raw completion payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl VideoOperation {
    /// Fresh, unfinished handle.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            error: None,
            response: None,
        }
    }

    /// URI of the first generated video, from either response shape the API returns.
    pub fn video_uri(&self) -> Option<&str> {
        let response = self.response.as_ref()?;
        response
            .pointer("/generateVideoResponse/generatedSamples/0/video/uri")
            .or_else(|| response.pointer("/generatedVideos/0/video/uri"))
            .and_then(serde_json::Value::as_str)
    }
}

/// Still image used to condition a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`
    pub mime_type: String,
}

impl ReferenceImage {
    /// Build from a base64 `data:` URL, as stored in `Panel::image_url`.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let (mime_type, bytes) = crate::decode_data_url(url)?;
        Some(Self { bytes, mime_type })
    }
}

/// Options for a video request beyond the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoRequest {
    /// Conditioning image
    pub image: Option<ReferenceImage>,
    /// Model override
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_uri_from_sample_shape() {
        let op = VideoOperation {
            response: Some(json!({
                "generateVideoResponse": {
                    "generatedSamples": [{"video": {"uri": "https://files/v.mp4?alt=media"}}]
                }
            })),
            ..VideoOperation::pending("operations/1")
        };
        assert_eq!(op.video_uri(), Some("https://files/v.mp4?alt=media"));
    }

    #[test]
    fn missing_uri_is_none() {
        let op = VideoOperation {
            done: true,
            response: Some(json!({"generateVideoResponse": {}})),
            ..VideoOperation::pending("operations/1")
        };
        assert_eq!(op.video_uri(), None);
    }

    #[test]
    fn error_deserializes() {
        let op: VideoOperation = serde_json::from_value(json!({
            "name": "operations/2",
            "done": true,
            "error": {"code": 3, "message": "Prompt rejected"}
        }))
        .unwrap();
        assert_eq!(op.error.unwrap().message, "Prompt rejected");
    }

    #[test]
    fn reference_image_from_data_url() {
        let url = crate::data_url("image/jpeg", b"jpg");
        let image = ReferenceImage::from_data_url(&url).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, b"jpg");
    }
}
