use crate::editor::Adjustments;

const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

/// `brightness(b) contrast(c) saturate(s)` chain applied to straight sRGB.
///
/// Stages run in that fixed order and each clamps into `[0, 1]`, so two
/// renders with the same adjustments are bit-identical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorFilter {
    brightness: f32,
    contrast: f32,
    saturate: [[f32; 3]; 3],
    identity: bool,
}

fn saturate_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = amount;
    [
        [
            LUMA_R + (1.0 - LUMA_R) * s,
            LUMA_G - LUMA_G * s,
            LUMA_B - LUMA_B * s,
        ],
        [
            LUMA_R - LUMA_R * s,
            LUMA_G + (1.0 - LUMA_G) * s,
            LUMA_B - LUMA_B * s,
        ],
        [
            LUMA_R - LUMA_R * s,
            LUMA_G - LUMA_G * s,
            LUMA_B + (1.0 - LUMA_B) * s,
        ],
    ]
}

impl ColorFilter {
    pub fn from_adjustments(adjustments: &Adjustments) -> Self {
        let percent = |value: u16| f32::from(value) / 100.0;
        Self {
            brightness: percent(adjustments.brightness()),
            contrast: percent(adjustments.contrast()),
            saturate: saturate_matrix(percent(adjustments.saturation())),
            identity: adjustments.is_identity(),
        }
    }

    pub const fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        if self.identity {
            return rgb;
        }
        let [r, g, b] = rgb.map(|channel| {
            let lit = (channel * self.brightness).clamp(0.0, 1.0);
            ((lit - 0.5) * self.contrast + 0.5).clamp(0.0, 1.0)
        });
        self.saturate
            .map(|row| (row[0] * r + row[1] * g + row[2] * b).clamp(0.0, 1.0))
    }
}
