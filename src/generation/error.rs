use thiserror::Error;

use crate::media::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    AccessDenied,
    QuotaExceeded,
    ServiceOverloaded,
    ContentBlocked,
    InvalidRequest,
    Unknown,
}

impl GenerationErrorKind {
    /// Buckets a raw service failure by the markers the service puts in it.
    pub fn classify(message: &str) -> Self {
        let has = |needle: &str| message.contains(needle);
        if has("403") || has("API key") {
            Self::AccessDenied
        } else if has("429") || has("quota") {
            Self::QuotaExceeded
        } else if has("503") || has("overloaded") {
            Self::ServiceOverloaded
        } else if has("SAFETY") || has("blocked") || has(NO_MEDIA_MARKER) {
            Self::ContentBlocked
        } else if has("400") {
            Self::InvalidRequest
        } else {
            Self::Unknown
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "access denied",
            Self::QuotaExceeded => "quota exceeded",
            Self::ServiceOverloaded => "service overloaded",
            Self::ContentBlocked => "content blocked",
            Self::InvalidRequest => "invalid request",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const NO_MEDIA_MARKER: &str = "no media in response";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(GenerationErrorKind::classify(&message), message)
    }

    pub fn no_media(media: MediaType) -> Self {
        Self::new(
            GenerationErrorKind::ContentBlocked,
            format!("{NO_MEDIA_MARKER}: the service returned no {}", media.label()),
        )
    }

    /// Readable text for the person who asked for `media`.
    pub fn user_message(&self, media: MediaType) -> String {
        let text = match (self.kind, media) {
            (GenerationErrorKind::AccessDenied, _) => {
                "Access denied. Please check your API key and ensure billing is enabled."
            }
            (GenerationErrorKind::QuotaExceeded, _) => {
                "Daily quota exceeded. Please try again later."
            }
            (GenerationErrorKind::ServiceOverloaded, MediaType::Image) => {
                "AI Service is currently overloaded. Please try again in a moment."
            }
            (GenerationErrorKind::ServiceOverloaded, MediaType::Video) => {
                "Video service is in high demand. Please try again in a moment."
            }
            (GenerationErrorKind::ContentBlocked, MediaType::Image) => {
                "Generation blocked by safety guidelines. Please try a different prompt."
            }
            (GenerationErrorKind::ContentBlocked, MediaType::Video)
                if self.message.contains(NO_MEDIA_MARKER) =>
            {
                "Generation failed. The model may be busy or the prompt was filtered."
            }
            (GenerationErrorKind::ContentBlocked, MediaType::Video) => {
                "Video generation blocked by safety guidelines. Please try a different prompt."
            }
            (GenerationErrorKind::InvalidRequest, _) => {
                "Invalid request. Please check your prompt and settings."
            }
            (GenerationErrorKind::Unknown, _) if self.message.trim().is_empty() => {
                "An unexpected error occurred."
            }
            (GenerationErrorKind::Unknown, _) => return self.message.clone(),
        };
        text.to_string()
    }
}
