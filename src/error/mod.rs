use crate::config::ConfigError;
use crate::generation::GenerationError;
use crate::history::HistoryError;
use crate::media::{MediaError, MediaType};
use crate::render::ExportError;
use crate::state::StateError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("{message}")]
    GenerationFailed {
        message: String,
        #[source]
        source: GenerationError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no history record with id {id}")]
    UnknownRecord { id: String },
    #[error("record {id} is a {media}; only images can be edited")]
    NotEditable { id: String, media: &'static str },
    #[error("no edit in progress")]
    NoActiveEdit,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Swaps a raw generation failure for the readable text shown to
    /// whoever asked for `media`. Other errors pass through.
    pub fn for_media(self, media: MediaType) -> Self {
        match self {
            Self::Generation(source) => Self::GenerationFailed {
                message: source.user_message(media),
                source,
            },
            other => other,
        }
    }
}
