use crate::geometry::{Point, Size, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropRatio {
    #[default]
    Original,
    Square,
    Wide16x9,
    Standard4x3,
}

impl CropRatio {
    pub const ALL: [CropRatio; 4] = [
        Self::Original,
        Self::Square,
        Self::Wide16x9,
        Self::Standard4x3,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Square => "1:1",
            Self::Wide16x9 => "16:9",
            Self::Standard4x3 => "4:3",
        }
    }

    /// Fixed `width:height` ratio, or `None` when the source's own ratio is kept.
    pub const fn ratio(self) -> Option<(u32, u32)> {
        match self {
            Self::Original => None,
            Self::Square => Some((1, 1)),
            Self::Wide16x9 => Some((16, 9)),
            Self::Standard4x3 => Some((4, 3)),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("original") {
            return Some(Self::Original);
        }
        Self::ALL.into_iter().find(|ratio| ratio.label() == label)
    }

    /// Largest box of this ratio that fits inside `source`, never upscaled.
    ///
    /// A zero-sized source yields a zero-sized box, which callers treat as
    /// "not ready" rather than as an error.
    pub fn target_dimensions(self, source: Size) -> Size {
        match self {
            Self::Original => source,
            Self::Square => {
                let side = source.width.min(source.height);
                Size::new(side, side)
            }
            Self::Wide16x9 => fit_ratio(source, 16.0, 9.0),
            Self::Standard4x3 => fit_ratio(source, 4.0, 3.0),
        }
    }
}

impl std::fmt::Display for CropRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn fit_ratio(source: Size, ratio_w: f64, ratio_h: f64) -> Size {
    let width = source.width;
    let height = width * (ratio_h / ratio_w);
    if height > source.height {
        let height = source.height;
        return Size::new(height * (ratio_w / ratio_h), height);
    }
    Size::new(width, height)
}

pub fn compute_target_dimensions(source: Size, ratio: CropRatio) -> Size {
    ratio.target_dimensions(source)
}

/// Anchor captured on pointer-down so that later moves translate pan 1:1.
pub fn drag_anchor(pointer_down: Point, pan_at_start: Vec2) -> Point {
    pointer_down - pan_at_start
}

pub fn pan_from_drag(pointer: Point, anchor: Point) -> Vec2 {
    pointer - anchor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_empty;

    fn sizes() -> Vec<Size> {
        vec![
            Size::new(1920.0, 1080.0),
            Size::new(1080.0, 1920.0),
            Size::new(1000.0, 1000.0),
            Size::new(800.0, 600.0),
            Size::new(1.0, 7.0),
            Size::new(333.0, 100.0),
        ]
    }

    #[test]
    fn crop_ratio_label_returns_expected_strings() {
        assert_eq!(CropRatio::Original.label(), "Original");
        assert_eq!(CropRatio::Square.label(), "1:1");
        assert_eq!(CropRatio::Wide16x9.label(), "16:9");
        assert_eq!(CropRatio::Standard4x3.label(), "4:3");
    }

    #[test]
    fn from_label_round_trips_every_variant() {
        for ratio in CropRatio::ALL {
            assert_eq!(CropRatio::from_label(ratio.label()), Some(ratio));
        }
        assert_eq!(CropRatio::from_label("ORIGINAL"), Some(CropRatio::Original));
        assert_eq!(CropRatio::from_label("3:2"), None);
    }

    #[test]
    fn target_never_exceeds_source_and_square_is_square() {
        for source in sizes() {
            for ratio in CropRatio::ALL {
                let target = compute_target_dimensions(source, ratio);
                assert!(target.width <= source.width, "{ratio} on {source:?}");
                assert!(target.height <= source.height, "{ratio} on {source:?}");
            }
            let square = compute_target_dimensions(source, CropRatio::Square);
            assert_eq!(square.width, square.height);
        }
    }

    #[test]
    fn wide_ratio_matches_reference_sizes() {
        assert_eq!(
            compute_target_dimensions(Size::new(1920.0, 1080.0), CropRatio::Wide16x9),
            Size::new(1920.0, 1080.0)
        );
        assert_eq!(
            compute_target_dimensions(Size::new(1000.0, 1000.0), CropRatio::Wide16x9),
            Size::new(1000.0, 562.5)
        );
    }

    #[test]
    fn wide_ratio_falls_back_to_height_for_portrait_sources() {
        let target = compute_target_dimensions(Size::new(1000.0, 300.0), CropRatio::Wide16x9);
        assert_eq!(target.height, 300.0);
        assert!((target.width - 300.0 * 16.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn standard_ratio_keeps_exact_four_by_three_source() {
        assert_eq!(
            compute_target_dimensions(Size::new(800.0, 600.0), CropRatio::Standard4x3),
            Size::new(800.0, 600.0)
        );
        assert_eq!(
            compute_target_dimensions(Size::new(1000.0, 1000.0), CropRatio::Standard4x3),
            Size::new(1000.0, 750.0)
        );
    }

    #[test]
    fn original_returns_source_and_unloaded_source_stays_empty() {
        let source = Size::new(640.0, 480.0);
        assert_eq!(compute_target_dimensions(source, CropRatio::Original), source);
        for ratio in CropRatio::ALL {
            assert!(is_empty(compute_target_dimensions(Size::ZERO, ratio)));
        }
    }

    #[test]
    fn drag_translates_pan_directly() {
        let anchor = drag_anchor(Point::new(100.0, 100.0), Vec2::ZERO);
        assert_eq!(
            pan_from_drag(Point::new(150.0, 120.0), anchor),
            Vec2::new(50.0, 20.0)
        );

        let anchor = drag_anchor(Point::new(10.0, 10.0), Vec2::new(50.0, 20.0));
        assert_eq!(
            pan_from_drag(Point::ORIGIN, anchor),
            Vec2::new(40.0, 10.0)
        );
    }
}
