//! Media locators: where generated media lives and how a source bitmap is
//! decoded from it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATA_URI_PREFIX: &str = "data:";
const FILE_URI_PREFIX: &str = "file://";
const BASE64_MARKER: &str = ";base64";
const PNG_MIME: &str = "image/png";
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported media locator: {locator}")]
    UnsupportedLocator { locator: String },
    #[error("malformed data uri: {message}")]
    InvalidDataUri { message: String },
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to read media file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

pub type MediaResult<T> = std::result::Result<T, MediaError>;

/// Parsed form of a history record's `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLocator {
    File(PathBuf),
    Inline { mime: String, bytes: Vec<u8> },
    Remote(String),
}

impl MediaLocator {
    pub fn parse(locator: &str) -> MediaResult<Self> {
        let trimmed = locator.trim();
        if let Some(rest) = trimmed.strip_prefix(DATA_URI_PREFIX) {
            return parse_data_uri(rest);
        }
        if let Some(path) = trimmed.strip_prefix(FILE_URI_PREFIX) {
            return Ok(Self::File(PathBuf::from(path)));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Self::Remote(trimmed.to_string()));
        }
        if trimmed.is_empty() || trimmed.contains("://") {
            return Err(MediaError::UnsupportedLocator {
                locator: trimmed.to_string(),
            });
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

fn parse_data_uri(rest: &str) -> MediaResult<MediaLocator> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MediaError::InvalidDataUri {
            message: "missing ',' separator".to_string(),
        })?;
    let Some(mime) = header.strip_suffix(BASE64_MARKER) else {
        return Err(MediaError::InvalidDataUri {
            message: format!("only base64 payloads are supported, got header {header:?}"),
        });
    };
    let bytes = BASE64.decode(payload.trim())?;
    Ok(MediaLocator::Inline {
        mime: mime.to_string(),
        bytes,
    })
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("{DATA_URI_PREFIX}{PNG_MIME}{BASE64_MARKER},{}", BASE64.encode(png))
}

pub trait MediaFetcher {
    fn fetch(&self, url: &str) -> MediaResult<Vec<u8>>;
}

#[derive(Debug, Default)]
pub struct HttpMediaFetcher;

impl MediaFetcher for HttpMediaFetcher {
    fn fetch(&self, url: &str) -> MediaResult<Vec<u8>> {
        let wrap = |source| MediaError::Fetch {
            url: url.to_string(),
            source,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(wrap)?;
        let response = client.get(url).send().map_err(wrap)?;
        let bytes = response
            .error_for_status()
            .map_err(wrap)?
            .bytes()
            .map_err(wrap)?;
        Ok(bytes.to_vec())
    }
}

/// Decodes the bitmap behind `locator` once, for use as an editor source.
pub fn load_source_image(locator: &MediaLocator) -> MediaResult<RgbaImage> {
    load_source_image_with(locator, &HttpMediaFetcher)
}

pub fn load_source_image_with<F: MediaFetcher>(
    locator: &MediaLocator,
    fetcher: &F,
) -> MediaResult<RgbaImage> {
    let image = match locator {
        MediaLocator::File(path) => image::load_from_memory(&read_file(path)?)?,
        MediaLocator::Inline { bytes, .. } => image::load_from_memory(bytes)?,
        MediaLocator::Remote(url) => image::load_from_memory(&fetcher.fetch(url)?)?,
    };
    let image = image.to_rgba8();
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        "decoded source image"
    );
    Ok(image)
}

fn read_file(path: &Path) -> MediaResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| MediaError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
