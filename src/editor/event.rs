use std::sync::Arc;

use image::RgbaImage;

use super::adjust::AdjustmentKind;
use super::crop::CropRatio;
use super::state::EditorMode;
use crate::geometry::Point;

/// Discrete inputs that drive the editor reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SourceDecoded(Arc<RgbaImage>),
    SelectMode(EditorMode),
    SetAdjustment { kind: AdjustmentKind, percent: i32 },
    SetCropRatio(CropRatio),
    SetZoom(f64),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    ResetAll,
}

impl EditorEvent {
    pub const fn brightness(percent: i32) -> Self {
        Self::SetAdjustment {
            kind: AdjustmentKind::Brightness,
            percent,
        }
    }

    pub const fn contrast(percent: i32) -> Self {
        Self::SetAdjustment {
            kind: AdjustmentKind::Contrast,
            percent,
        }
    }

    pub const fn saturation(percent: i32) -> Self {
        Self::SetAdjustment {
            kind: AdjustmentKind::Saturation,
            percent,
        }
    }

    pub const fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown(_) | Self::PointerMove(_) | Self::PointerUp | Self::PointerLeave
        )
    }
}
