//! Geometry shared by the editor and the compositor, on `kurbo` types.

pub use kurbo::{Affine, Point, Size, Vec2};

/// Size of a `width` x `height` bitmap.
pub fn pixel_size(width: u32, height: u32) -> Size {
    Size::new(f64::from(width), f64::from(height))
}

/// True unless both dimensions are positive.
pub fn is_empty(size: Size) -> bool {
    !(size.width > 0.0 && size.height > 0.0)
}

/// Whole-pixel dimensions of a raster surface of `size`.
///
/// Fractional components are truncated toward zero, the same way a
/// raster canvas treats a fractional width or height assignment.
pub fn to_pixels(size: Size) -> Option<(u32, u32)> {
    if !size.width.is_finite() || !size.height.is_finite() {
        return None;
    }
    let width = size.width.max(0.0).trunc();
    let height = size.height.max(0.0).trunc();
    if width < 1.0 || height < 1.0 || width > f64::from(u32::MAX) || height > f64::from(u32::MAX) {
        return None;
    }
    Some((width as u32, height as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_pixels_truncates_fractional_dimensions() {
        assert_eq!(to_pixels(Size::new(1000.0, 562.5)), Some((1000, 562)));
        assert_eq!(to_pixels(Size::new(0.9, 10.0)), None);
        assert_eq!(to_pixels(Size::new(f64::NAN, 10.0)), None);
    }

    #[test]
    fn empty_size_covers_zero_and_negative_dimensions() {
        assert!(is_empty(Size::new(0.0, 10.0)));
        assert!(is_empty(Size::new(10.0, -1.0)));
        assert!(!is_empty(pixel_size(1, 1)));
    }

    #[test]
    fn point_difference_is_a_drag_delta() {
        let delta = Point::new(150.0, 120.0) - Point::new(100.0, 100.0);
        assert_eq!(delta, Vec2::new(50.0, 20.0));
    }
}
