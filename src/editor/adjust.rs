pub const ADJUSTMENT_MIN_PERCENT: u16 = 0;
pub const ADJUSTMENT_MAX_PERCENT: u16 = 200;
pub const ADJUSTMENT_IDENTITY_PERCENT: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Brightness,
    Contrast,
    Saturation,
}

impl AdjustmentKind {
    pub const ALL: [AdjustmentKind; 3] = [Self::Brightness, Self::Contrast, Self::Saturation];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::Saturation => "Saturation",
        }
    }
}

/// Color adjustments as integer percentages; `100` leaves the image untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustments {
    brightness: u16,
    contrast: u16,
    saturation: u16,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self::identity()
    }
}

fn clamp_percent(percent: i32) -> u16 {
    let clamped = percent.clamp(
        i32::from(ADJUSTMENT_MIN_PERCENT),
        i32::from(ADJUSTMENT_MAX_PERCENT),
    );
    u16::try_from(clamped).unwrap_or(ADJUSTMENT_IDENTITY_PERCENT)
}

impl Adjustments {
    pub const fn identity() -> Self {
        Self {
            brightness: ADJUSTMENT_IDENTITY_PERCENT,
            contrast: ADJUSTMENT_IDENTITY_PERCENT,
            saturation: ADJUSTMENT_IDENTITY_PERCENT,
        }
    }

    pub fn new(brightness: i32, contrast: i32, saturation: i32) -> Self {
        Self {
            brightness: clamp_percent(brightness),
            contrast: clamp_percent(contrast),
            saturation: clamp_percent(saturation),
        }
    }

    pub const fn brightness(&self) -> u16 {
        self.brightness
    }

    pub const fn contrast(&self) -> u16 {
        self.contrast
    }

    pub const fn saturation(&self) -> u16 {
        self.saturation
    }

    pub const fn get(&self, kind: AdjustmentKind) -> u16 {
        match kind {
            AdjustmentKind::Brightness => self.brightness,
            AdjustmentKind::Contrast => self.contrast,
            AdjustmentKind::Saturation => self.saturation,
        }
    }

    /// Returns a copy with `kind` set to `percent`, clamped into `[0, 200]`.
    #[must_use]
    pub fn with(mut self, kind: AdjustmentKind, percent: i32) -> Self {
        let percent = clamp_percent(percent);
        match kind {
            AdjustmentKind::Brightness => self.brightness = percent,
            AdjustmentKind::Contrast => self.contrast = percent,
            AdjustmentKind::Saturation => self.saturation = percent,
        }
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustments_start_at_identity() {
        let adjustments = Adjustments::default();
        for kind in AdjustmentKind::ALL {
            assert_eq!(adjustments.get(kind), 100);
        }
        assert!(adjustments.is_identity());
    }

    #[test]
    fn with_clamps_out_of_range_percentages() {
        let adjustments = Adjustments::identity()
            .with(AdjustmentKind::Brightness, -40)
            .with(AdjustmentKind::Contrast, 450)
            .with(AdjustmentKind::Saturation, 0);
        assert_eq!(adjustments.brightness(), 0);
        assert_eq!(adjustments.contrast(), 200);
        assert_eq!(adjustments.saturation(), 0);
        assert!(!adjustments.is_identity());
    }

    #[test]
    fn new_clamps_each_component() {
        let adjustments = Adjustments::new(201, 150, -1);
        assert_eq!(
            (
                adjustments.brightness(),
                adjustments.contrast(),
                adjustments.saturation()
            ),
            (200, 150, 0)
        );
    }
}
