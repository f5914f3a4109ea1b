use serde::{Deserialize, Serialize};

/// Width divided by height of the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio(f32);

impl AspectRatio {
    pub const WIDESCREEN: Self = Self(16.0 / 9.0);
    pub const SQUARE: Self = Self(1.0);

    /// `None` for ratios that cannot size a box (zero, negative, NaN, infinite).
    pub fn new(ratio: f32) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }

    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        if height == 0 {
            return None;
        }
        Self::new(width as f32 / height as f32)
    }

    /// Falls back to 16:9 when the option is missing or unusable.
    pub fn or_default(ratio: Option<f32>) -> Self {
        ratio.and_then(Self::new).unwrap_or_default()
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_portrait(self) -> bool {
        self.0 < 1.0
    }

    pub fn is_square(self) -> bool {
        (self.0 - 1.0).abs() < f32::EPSILON
    }

    pub fn height_for(self, width: f32) -> f32 {
        width / self.0
    }

    pub fn width_for(self, height: f32) -> f32 {
        height * self.0
    }

    /// Largest `(width, height)` with this ratio that fits inside the bounds.
    pub fn fit_within(self, max_width: f32, max_height: f32) -> (f32, f32) {
        if max_width <= 0.0 || max_height <= 0.0 {
            return (0.0, 0.0);
        }

        if max_width / max_height > self.0 {
            (self.width_for(max_height), max_height)
        } else {
            (max_width, self.height_for(max_width))
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}
