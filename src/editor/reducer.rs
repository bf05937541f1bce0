use super::crop::{drag_anchor, pan_from_drag, CropRatio};
use super::event::EditorEvent;
use super::state::{DragState, EditorMode, EditorState, SourceImage, Zoom};
use crate::geometry::Vec2;

/// Applies one event to `state` and returns the resulting state.
///
/// Pure: the caller decides what effects follow (the session recomposites
/// whenever the returned state differs from the input).
pub fn reduce(state: &EditorState, event: &EditorEvent) -> EditorState {
    let mut next = state.clone();
    match event {
        EditorEvent::SourceDecoded(image) => {
            if !state.source.is_ready() {
                next.source = SourceImage::Ready(image.clone());
            }
        }
        EditorEvent::SelectMode(mode) => {
            if *mode != EditorMode::Crop {
                next.drag = None;
            }
            next.mode = *mode;
        }
        EditorEvent::SetAdjustment { kind, percent } => {
            next.adjustments = state.adjustments.with(*kind, *percent);
        }
        EditorEvent::SetCropRatio(ratio) => {
            if *ratio != state.crop_ratio {
                next.crop_ratio = *ratio;
                next.zoom = Zoom::IDENTITY;
                next.pan = Vec2::ZERO;
            }
        }
        EditorEvent::SetZoom(value) => {
            if let Some(zoom) = Zoom::new(*value) {
                next.zoom = zoom;
            }
        }
        EditorEvent::PointerDown(pointer) => {
            if state.mode == EditorMode::Crop && state.drag.is_none() {
                next.drag = Some(DragState {
                    anchor: drag_anchor(*pointer, state.pan),
                });
            }
        }
        EditorEvent::PointerMove(pointer) => {
            if let (EditorMode::Crop, Some(drag)) = (state.mode, state.drag) {
                next.pan = pan_from_drag(*pointer, drag.anchor);
            }
        }
        EditorEvent::PointerUp | EditorEvent::PointerLeave => {
            if state.mode == EditorMode::Crop {
                next.drag = None;
            }
        }
        EditorEvent::ResetAll => {
            next.adjustments = Default::default();
            next.zoom = Zoom::IDENTITY;
            next.pan = Vec2::ZERO;
            next.crop_ratio = CropRatio::Original;
            next.drag = None;
        }
    }
    next
}
