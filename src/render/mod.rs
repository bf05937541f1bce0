//! Rasterizes editor state into an offscreen RGBA surface.

mod export;
mod filter;

pub use export::{encode_png, ExportError};
pub use filter::ColorFilter;

use std::fmt;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, ColorU8, FilterQuality, IntSize, Pixmap, PixmapPaint, PremultipliedColorU8,
};

use crate::editor::EditorState;
use crate::geometry::{to_pixels, Affine, Size, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOutcome {
    Rendered { width: u32, height: u32 },
    NotReady,
}

impl CompositeOutcome {
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

pub trait Compositor {
    /// Re-renders the surface from scratch for `state`.
    fn composite(&mut self, state: &EditorState) -> CompositeOutcome;

    /// Last rendered surface, if any composite has succeeded.
    fn surface(&self) -> Option<&RgbaImage>;
}

/// CPU compositor backed by `tiny-skia`.
///
/// The premultiplied copy of the source is kept across composites and only
/// rebuilt when a different bitmap arrives. The drawing canvas and the
/// output surface are reused while the target size stays the same.
#[derive(Default)]
pub struct RasterCompositor {
    surface: Option<RgbaImage>,
    canvas: Option<Pixmap>,
    source: Option<(Arc<RgbaImage>, Pixmap)>,
}

impl RasterCompositor {
    pub const fn new() -> Self {
        Self {
            surface: None,
            canvas: None,
            source: None,
        }
    }

    pub fn into_surface(self) -> Option<RgbaImage> {
        self.surface
    }
}

impl fmt::Debug for RasterCompositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterCompositor")
            .field("surface", &self.surface.as_ref().map(RgbaImage::dimensions))
            .field("source_cached", &self.source.is_some())
            .finish()
    }
}

impl Compositor for RasterCompositor {
    fn composite(&mut self, state: &EditorState) -> CompositeOutcome {
        let Some(bitmap) = state.source.shared() else {
            tracing::debug!("composite skipped: source image not decoded");
            return CompositeOutcome::NotReady;
        };
        let target = state.target_dimensions();
        let Some((width, height)) = to_pixels(target) else {
            tracing::debug!(?target, "composite skipped: empty target");
            return CompositeOutcome::NotReady;
        };

        let Self {
            surface: surface_slot,
            canvas: canvas_slot,
            source: source_slot,
        } = self;

        let stale =
            !matches!(source_slot.as_ref(), Some((cached, _)) if Arc::ptr_eq(cached, bitmap));
        if stale {
            *source_slot = source_pixmap(bitmap).map(|pixmap| (Arc::clone(bitmap), pixmap));
        }
        let Some((_, source)) = source_slot.as_ref() else {
            tracing::warn!(
                width = bitmap.width(),
                height = bitmap.height(),
                "composite skipped: source does not fit a raster canvas"
            );
            return CompositeOutcome::NotReady;
        };

        let canvas = match canvas_slot.take() {
            Some(mut canvas) if (canvas.width(), canvas.height()) == (width, height) => {
                canvas.fill(Color::TRANSPARENT);
                canvas
            }
            _ => match Pixmap::new(width, height) {
                Some(canvas) => canvas,
                None => {
                    tracing::warn!(width, height, "composite skipped: canvas allocation failed");
                    return CompositeOutcome::NotReady;
                }
            },
        };
        let canvas = canvas_slot.insert(canvas);

        let transform = draw_transform(target, state.zoom.value(), state.pan)
            * Affine::translate(draw_origin(target, state.source.size()));
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        canvas.draw_pixmap(0, 0, source.as_ref(), &paint, to_skia(transform), None);

        let surface = match surface_slot.take() {
            Some(surface) if surface.dimensions() == (width, height) => surface,
            _ => RgbaImage::new(width, height),
        };
        let surface = surface_slot.insert(surface);
        let filter = ColorFilter::from_adjustments(&state.adjustments);
        for (out, pixel) in surface.pixels_mut().zip(canvas.pixels()) {
            *out = filtered_pixel(*pixel, &filter);
        }

        tracing::debug!(
            width,
            height,
            crop = %state.crop_ratio,
            zoom = state.zoom.value(),
            pan_x = state.pan.x,
            pan_y = state.pan.y,
            "composite rendered"
        );
        CompositeOutcome::Rendered { width, height }
    }

    fn surface(&self) -> Option<&RgbaImage> {
        self.surface.as_ref()
    }
}

/// One-shot render of `state` into a fresh surface.
pub fn render(state: &EditorState) -> Option<RgbaImage> {
    let mut compositor = RasterCompositor::new();
    compositor
        .composite(state)
        .is_rendered()
        .then(|| compositor.into_surface())
        .flatten()
}

/// Zoom about the target center, then pan in zoomed drawing space.
fn draw_transform(target: Size, zoom: f64, pan: Vec2) -> Affine {
    let center = target.to_vec2() / 2.0;
    Affine::translate(center)
        * Affine::scale(zoom)
        * Affine::translate(-center)
        * Affine::translate(pan)
}

/// Native-resolution placement that centers the source over the target.
fn draw_origin(target: Size, source: Size) -> Vec2 {
    (target.to_vec2() - source.to_vec2()) / 2.0
}

fn to_skia(affine: Affine) -> tiny_skia::Transform {
    let [sx, ky, kx, sy, tx, ty] = affine.as_coeffs();
    tiny_skia::Transform::from_row(
        sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32,
    )
}

fn source_pixmap(bitmap: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(bitmap.width(), bitmap.height())?;
    let data = bitmap
        .pixels()
        .flat_map(|&Rgba([r, g, b, a])| {
            let color = ColorU8::from_rgba(r, g, b, a).premultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Straight-alpha output pixel; the filter only touches drawn pixels.
fn filtered_pixel(pixel: PremultipliedColorU8, filter: &ColorFilter) -> Rgba<u8> {
    let color = pixel.demultiply();
    let (r, g, b, a) = (color.red(), color.green(), color.blue(), color.alpha());
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    if filter.is_identity() {
        return Rgba([r, g, b, a]);
    }
    let channel = |value: u8| f32::from(value) / 255.0;
    let quantize = |value: f32| (value * 255.0).round().clamp(0.0, 255.0) as u8;
    let [r, g, b] = filter.apply([channel(r), channel(g), channel(b)]);
    Rgba([quantize(r), quantize(g), quantize(b), a])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{reduce, CropRatio, EditorEvent, EditorMode, SourceImage};
    use crate::geometry::Point;
    use std::sync::Arc;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8, 255])
        })
    }

    fn state_for(image: RgbaImage) -> EditorState {
        EditorState::new(SourceImage::ready(image))
    }

    fn apply(state: EditorState, events: &[EditorEvent]) -> EditorState {
        events
            .iter()
            .fold(state, |state, event| reduce(&state, event))
    }

    #[test]
    fn not_ready_source_is_a_no_op() {
        let mut compositor = RasterCompositor::new();
        let outcome = compositor.composite(&EditorState::default());
        assert_eq!(outcome, CompositeOutcome::NotReady);
        assert!(compositor.surface().is_none());
    }

    #[test]
    fn identity_state_reproduces_opaque_source() {
        let source = gradient(9, 5);
        let rendered = render(&state_for(source.clone())).expect("rendered");
        assert_eq!(rendered, source);
    }

    #[test]
    fn surface_matches_policy_target_dimensions() {
        let state = apply(
            state_for(gradient(1000, 1000)),
            &[EditorEvent::SetCropRatio(CropRatio::Wide16x9)],
        );
        let mut compositor = RasterCompositor::new();
        assert_eq!(
            compositor.composite(&state),
            CompositeOutcome::Rendered {
                width: 1000,
                height: 562
            }
        );

        let state = apply(state, &[EditorEvent::SetCropRatio(CropRatio::Square)]);
        compositor.composite(&state);
        assert_eq!(compositor.surface().map(|s| s.dimensions()), Some((1000, 1000)));
    }

    #[test]
    fn square_crop_takes_the_centered_region() {
        let source = gradient(8, 4);
        let state = apply(
            state_for(source.clone()),
            &[EditorEvent::SetCropRatio(CropRatio::Square)],
        );
        let rendered = render(&state).expect("rendered");
        assert_eq!(rendered.dimensions(), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(rendered.get_pixel(x, y), source.get_pixel(x + 2, y));
            }
        }
    }

    #[test]
    fn pan_shifts_image_and_exposes_transparency() {
        let source = gradient(4, 4);
        let state = apply(
            state_for(source.clone()),
            &[
                EditorEvent::SelectMode(EditorMode::Crop),
                EditorEvent::PointerDown(Point::new(10.0, 10.0)),
                EditorEvent::PointerMove(Point::new(11.0, 10.0)),
            ],
        );
        let rendered = render(&state).expect("rendered");
        for y in 0..4 {
            assert_eq!(rendered.get_pixel(0, y).0[3], 0);
            for x in 1..4 {
                assert_eq!(rendered.get_pixel(x, y), source.get_pixel(x - 1, y));
            }
        }
    }

    #[test]
    fn zoom_out_leaves_transparent_border() {
        let source = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 255]));
        let state = apply(state_for(source), &[EditorEvent::SetZoom(0.5)]);
        let rendered = render(&state).expect("rendered");
        assert_eq!(rendered.get_pixel(0, 0).0[3], 0);
        assert_eq!(rendered.get_pixel(7, 7).0[3], 0);
        let Rgba(center) = *rendered.get_pixel(4, 4);
        for (channel, expected) in center.into_iter().zip([200_u8, 100, 50, 255]) {
            assert!(channel.abs_diff(expected) <= 1, "{center:?}");
        }
    }

    #[test]
    fn filters_apply_to_drawn_pixels_and_preserve_alpha() {
        let source = RgbaImage::from_pixel(3, 3, Rgba([120, 60, 30, 128]));
        let state = apply(state_for(source), &[EditorEvent::brightness(0)]);
        let rendered = render(&state).expect("rendered");
        for pixel in rendered.pixels() {
            assert_eq!(*pixel, Rgba([0, 0, 0, 128]));
        }
    }

    #[test]
    fn composite_is_idempotent_and_not_cumulative() {
        let state = apply(
            state_for(gradient(31, 17)),
            &[
                EditorEvent::SelectMode(EditorMode::Crop),
                EditorEvent::SetCropRatio(CropRatio::Standard4x3),
                EditorEvent::SetZoom(1.7),
                EditorEvent::PointerDown(Point::new(3.0, 3.0)),
                EditorEvent::PointerMove(Point::new(5.5, -1.25)),
                EditorEvent::contrast(140),
                EditorEvent::saturation(30),
            ],
        );
        let mut compositor = RasterCompositor::new();
        compositor.composite(&state);
        let first = compositor.surface().cloned().expect("first");
        compositor.composite(&state);
        let second = compositor.surface().cloned().expect("second");
        assert_eq!(first, second);
        assert_eq!(encode_png(&first).ok(), encode_png(&second).ok());
    }

    #[test]
    fn shared_source_is_not_mutated_by_compositing() {
        let source = Arc::new(gradient(6, 6));
        let state = apply(
            EditorState::default(),
            &[
                EditorEvent::SourceDecoded(source.clone()),
                EditorEvent::brightness(180),
                EditorEvent::SetZoom(2.0),
            ],
        );
        let _ = render(&state);
        assert_eq!(*source, gradient(6, 6));
    }

    #[test]
    fn a_new_source_bitmap_replaces_the_cached_one() {
        let mut compositor = RasterCompositor::new();
        compositor.composite(&state_for(gradient(5, 5)));

        let replacement = RgbaImage::from_pixel(5, 5, Rgba([10, 220, 30, 255]));
        compositor.composite(&state_for(replacement.clone()));
        assert_eq!(compositor.surface(), Some(&replacement));
    }

    #[test]
    fn affine_converts_coefficients_in_canvas_order() {
        let affine = Affine::translate((3.0, -2.0)) * Affine::scale(2.0);
        let transform = to_skia(affine);
        assert_eq!(
            (transform.sx, transform.ky, transform.kx, transform.sy),
            (2.0, 0.0, 0.0, 2.0)
        );
        assert_eq!((transform.tx, transform.ty), (3.0, -2.0));
    }

    #[test]
    fn zoom_scales_about_the_target_center() {
        let target = Size::new(100.0, 50.0);
        let transform = draw_transform(target, 2.0, Vec2::ZERO);
        assert_eq!(transform * Point::new(50.0, 25.0), Point::new(50.0, 25.0));
        assert_eq!(transform * Point::ORIGIN, Point::new(-50.0, -25.0));

        let panned = draw_transform(target, 2.0, Vec2::new(10.0, -5.0));
        assert_eq!(panned * Point::new(50.0, 25.0), Point::new(70.0, 15.0));
    }
}
