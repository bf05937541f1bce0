//! Boundary with the remote generation service.
//!
//! The editor never calls into this module; it only receives the media
//! locators that generation produces.

mod error;
pub mod gemini;
pub mod prompt;

use std::sync::mpsc;
use std::sync::Arc;

pub use error::{GenerationError, GenerationErrorKind};
pub use gemini::GeminiBackend;
pub use prompt::{CastMember, ComposedPrompt, GenerationKind, PromptSpec};

use crate::media::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageAspectRatio {
    #[default]
    Square,
    Landscape,
    Portrait,
    Standard,
    Tall,
}

impl ImageAspectRatio {
    pub const ALL: [ImageAspectRatio; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Portrait,
        Self::Standard,
        Self::Tall,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::Tall => "3:4",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ratio| ratio.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionTier {
    #[default]
    OneK,
    TwoK,
    FourK,
}

impl ResolutionTier {
    pub const ALL: [ResolutionTier; 3] = [Self::OneK, Self::TwoK, Self::FourK];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoAspectRatio {
    #[default]
    Landscape,
    Portrait,
}

impl VideoAspectRatio {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [Self::Landscape, Self::Portrait]
            .into_iter()
            .find(|ratio| ratio.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoResolution {
    #[default]
    Hd720,
    Hd1080,
}

impl VideoResolution {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        [Self::Hd720, Self::Hd1080]
            .into_iter()
            .find(|resolution| resolution.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: ImageAspectRatio,
    pub resolution: ResolutionTier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    pub prompt: String,
    pub aspect_ratio: VideoAspectRatio,
    pub resolution: VideoResolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Image(ImageRequest),
    Video(VideoRequest),
}

impl GenerationRequest {
    pub const fn media_type(&self) -> MediaType {
        match self {
            Self::Image(_) => MediaType::Image,
            Self::Video(_) => MediaType::Video,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::Image(request) => &request.prompt,
            Self::Video(request) => &request.prompt,
        }
    }

    /// Tag stored alongside the result in history.
    pub const fn aspect_ratio_tag(&self) -> &'static str {
        match self {
            Self::Image(request) => request.aspect_ratio.as_str(),
            Self::Video(request) => request.aspect_ratio.as_str(),
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt().trim().is_empty() {
            return Err(GenerationError::new(
                GenerationErrorKind::InvalidRequest,
                "prompt is empty",
            ));
        }
        Ok(())
    }
}

/// Remote service that turns a request into a media locator (URL or data URI).
pub trait GenerationBackend: Send + Sync {
    fn generate_image(&self, request: &ImageRequest) -> Result<String, GenerationError>;
    fn generate_video(&self, request: &VideoRequest) -> Result<String, GenerationError>;

    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        request.validate()?;
        match request {
            GenerationRequest::Image(request) => self.generate_image(request),
            GenerationRequest::Video(request) => self.generate_video(request),
        }
    }
}

#[derive(Debug)]
pub enum JobPoll {
    Pending,
    Finished(Result<String, GenerationError>),
}

/// Handle to a generation running on a worker thread.
///
/// Dropping the handle discards interest in the result; the worker's send
/// then fails silently.
#[derive(Debug)]
pub struct GenerationJob {
    request: GenerationRequest,
    receiver: mpsc::Receiver<Result<String, GenerationError>>,
}

impl GenerationJob {
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    pub fn try_result(&self) -> JobPoll {
        match self.receiver.try_recv() {
            Ok(result) => JobPoll::Finished(result),
            Err(mpsc::TryRecvError::Empty) => JobPoll::Pending,
            Err(mpsc::TryRecvError::Disconnected) => JobPoll::Finished(Err(worker_lost())),
        }
    }

    pub fn wait(self) -> Result<String, GenerationError> {
        self.receiver.recv().unwrap_or_else(|_| Err(worker_lost()))
    }
}

fn worker_lost() -> GenerationError {
    GenerationError::new(
        GenerationErrorKind::Unknown,
        "generation worker exited without a result",
    )
}

pub fn spawn_job<B>(backend: Arc<B>, request: GenerationRequest) -> GenerationJob
where
    B: GenerationBackend + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel();
    let worker_request = request.clone();
    std::thread::spawn(move || {
        tracing::info!(
            media = worker_request.media_type().label(),
            aspect_ratio = worker_request.aspect_ratio_tag(),
            "generation started"
        );
        let result = backend.generate(&worker_request);
        if let Err(err) = &result {
            tracing::warn!(kind = %err.kind, message = %err.message, "generation failed");
        }
        let _ = tx.send(result);
    });
    GenerationJob {
        request,
        receiver: rx,
    }
}
