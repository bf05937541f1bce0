use std::sync::Arc;

use image::RgbaImage;

use super::adjust::Adjustments;
use super::crop::CropRatio;
use crate::geometry::{pixel_size, Point, Size, Vec2};

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 3.0;
pub const ZOOM_IDENTITY: f64 = 1.0;

/// Decoded source bitmap, or the absence of one while decode is pending.
#[derive(Debug, Clone, Default)]
pub enum SourceImage {
    #[default]
    NotReady,
    Ready(Arc<RgbaImage>),
}

impl SourceImage {
    pub fn ready(image: RgbaImage) -> Self {
        Self::Ready(Arc::new(image))
    }

    pub fn bitmap(&self) -> Option<&RgbaImage> {
        match self {
            Self::NotReady => None,
            Self::Ready(image) => Some(image.as_ref()),
        }
    }

    pub fn shared(&self) -> Option<&Arc<RgbaImage>> {
        match self {
            Self::NotReady => None,
            Self::Ready(image) => Some(image),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Intrinsic size, zero while not ready.
    pub fn size(&self) -> Size {
        self.bitmap()
            .map(|image| pixel_size(image.width(), image.height()))
            .unwrap_or_default()
    }
}

impl PartialEq for SourceImage {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotReady, Self::NotReady) => true,
            (Self::Ready(left), Self::Ready(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f64);

impl Zoom {
    pub const IDENTITY: Zoom = Zoom(ZOOM_IDENTITY);

    /// Clamps into `[0.5, 3.0]`; returns `None` for non-finite input.
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Self(value.clamp(ZOOM_MIN, ZOOM_MAX)))
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Adjust,
    Crop,
}

impl EditorMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Adjust => "Adjust",
            Self::Crop => "Crop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub anchor: Point,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    pub source: SourceImage,
    pub adjustments: Adjustments,
    pub crop_ratio: CropRatio,
    pub zoom: Zoom,
    pub pan: Vec2,
    pub drag: Option<DragState>,
    pub mode: EditorMode,
}

impl EditorState {
    pub fn new(source: SourceImage) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Policy-derived output size; empty while the source is not ready.
    pub fn target_dimensions(&self) -> Size {
        self.crop_ratio.target_dimensions(self.source.size())
    }
}
