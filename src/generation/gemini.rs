use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::{GenerationBackend, GenerationError, GenerationErrorKind, ImageRequest, VideoRequest};
use crate::config::AppConfig;
use crate::media::MediaType;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
pub const DEFAULT_VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST API client: `generateContent` for images, a polled
/// long-running `predictLongRunning` operation for videos.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    image_model: String,
    video_model: String,
    poll_interval: Duration,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            client,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: api_key.into(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            poll_interval: DEFAULT_VIDEO_POLL_INTERVAL,
        })
    }

    pub fn from_config(
        config: &AppConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        Ok(Self::new(api_key)?
            .with_base_url(config.api_base_url())
            .with_models(config.image_model(), config.video_model())
            .with_poll_interval(config.video_poll_interval()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models(
        mut self,
        image_model: impl Into<String>,
        video_model: impl Into<String>,
    ) -> Self {
        self.image_model = image_model.into();
        self.video_model = video_model.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn post(&self, url: &str, body: &Value) -> Result<Value, GenerationError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .map_err(transport_error)?;
        read_json(response)
    }

    fn get(&self, url: &str) -> Result<Value, GenerationError> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(transport_error)?;
        read_json(response)
    }
}

impl GenerationBackend for GeminiBackend {
    fn generate_image(&self, request: &ImageRequest) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.image_model);
        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": {
                    "aspectRatio": request.aspect_ratio.as_str(),
                    "imageSize": request.resolution.as_str(),
                },
            },
        });
        let response = self.post(&url, &body)?;
        extract_inline_image(&response).ok_or_else(|| GenerationError::no_media(MediaType::Image))
    }

    fn generate_video(&self, request: &VideoRequest) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.base_url, self.video_model
        );
        let body = json!({
            "instances": [{ "prompt": request.prompt }],
            "parameters": {
                "aspectRatio": request.aspect_ratio.as_str(),
                "resolution": request.resolution.as_str(),
            },
        });
        let mut operation = self.post(&url, &body)?;
        let name = operation
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GenerationError::classify("operation response carried no name"))?;

        let mut polls = 0_u32;
        while !operation_done(&operation) {
            std::thread::sleep(self.poll_interval);
            polls = polls.saturating_add(1);
            tracing::debug!(operation = %name, polls, "polling video operation");
            operation = self.get(&format!("{}/{}", self.base_url, name))?;
        }

        if let Some(error) = operation.get("error") {
            return Err(GenerationError::classify(error.to_string()));
        }
        let uri = extract_video_uri(&operation)
            .ok_or_else(|| GenerationError::no_media(MediaType::Video))?;
        Ok(append_key(&uri, &self.api_key))
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    let status = err.status().map(|status| status.as_u16().to_string());
    let message = match status {
        Some(status) => format!("{status}: {err}"),
        None => err.to_string(),
    };
    GenerationError::classify(message)
}

fn read_json(response: reqwest::blocking::Response) -> Result<Value, GenerationError> {
    let status = response.status();
    let text = response.text().map_err(transport_error)?;
    if !status.is_success() {
        return Err(GenerationError::classify(format!(
            "{}: {}",
            status.as_u16(),
            text.trim()
        )));
    }
    serde_json::from_str(&text).map_err(|err| {
        GenerationError::new(
            GenerationErrorKind::Unknown,
            format!("unreadable service response: {err}"),
        )
    })
}

fn operation_done(operation: &Value) -> bool {
    operation.get("done").and_then(Value::as_bool).unwrap_or(false)
}

/// First inline image part of a `generateContent` response, as a data URI.
fn extract_inline_image(response: &Value) -> Option<String> {
    let parts = response
        .pointer("/candidates/0/content/parts")?
        .as_array()?;
    parts.iter().find_map(|part| {
        let inline = part.get("inlineData")?;
        let data = inline.get("data")?.as_str()?;
        let mime = inline
            .get("mimeType")
            .and_then(Value::as_str)
            .unwrap_or("image/png");
        Some(format!("data:{mime};base64,{data}"))
    })
}

fn extract_video_uri(operation: &Value) -> Option<String> {
    operation
        .pointer("/response/generateVideoResponse/generatedSamples/0/video/uri")
        .or_else(|| operation.pointer("/response/generatedVideos/0/video/uri"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Download links for generated videos need the key appended.
fn append_key(uri: &str, api_key: &str) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}key={api_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_image_part_becomes_data_uri() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                ] }
            }]
        });
        assert_eq!(
            extract_inline_image(&response).as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn text_only_response_has_no_image() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "I can't draw that" }] } }]
        });
        assert_eq!(extract_inline_image(&response), None);
        assert_eq!(extract_inline_image(&json!({})), None);
    }

    #[test]
    fn finished_operation_yields_video_uri_with_key() {
        let operation = json!({
            "name": "models/veo/operations/abc",
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [
                { "video": { "uri": "https://files.example/v1/abc:download?alt=media" } }
            ] } }
        });
        assert!(operation_done(&operation));
        let uri = extract_video_uri(&operation).expect("uri");
        assert_eq!(
            append_key(&uri, "k123"),
            "https://files.example/v1/abc:download?alt=media&key=k123"
        );
        assert_eq!(append_key("https://x/y", "k"), "https://x/y?key=k");
    }

    #[test]
    fn pending_operation_is_not_done() {
        assert!(!operation_done(&json!({ "name": "op" })));
        assert!(!operation_done(&json!({ "name": "op", "done": false })));
    }
}
