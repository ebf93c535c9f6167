// Percentage view of a bounding box, in the shape a percentage-positioned UI
// (absolute `top` / `left` / `right` / `height`) consumes directly.

use crate::core_modules::bounding_box::BoundingBox;
use serde::{Deserialize, Serialize};

/// Layout offsets as percentages of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentLayout {
    pub top: f64,
    pub left: f64,
    /// `100 - max_x / width * 100`.
    pub right: f64,
    /// `(max_y - min_y) / height * 100`.
    pub height: f64,
    pub width: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl PercentLayout {
    /// Converts `bbox` against a `width × height` image. Both dimensions are
    /// non-zero whenever a box exists.
    pub fn from_box(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let w = width as f64;
        let h = height as f64;
        let pct = |value: f64, of: f64| value / of * 100.0;

        Self {
            top: pct(bbox.min_y as f64, h),
            left: pct(bbox.min_x as f64, w),
            right: 100.0 - pct(bbox.max_x as f64, w),
            height: pct(bbox.span_y() as f64, h),
            width: pct(bbox.span_x() as f64, w),
            center_x: pct((bbox.min_x + bbox.max_x) as f64 / 2.0, w),
            center_y: pct((bbox.min_y + bbox.max_y) as f64 / 2.0, h),
        }
    }

    /// Reconstructs `min_x` for an image `width` pixels wide.
    pub fn min_x_for(&self, width: u32) -> u32 {
        (self.left / 100.0 * width as f64).round() as u32
    }

    /// Reconstructs `min_y` for an image `height` pixels tall.
    pub fn min_y_for(&self, height: u32) -> u32 {
        (self.top / 100.0 * height as f64).round() as u32
    }

    /// Reconstructs `max_x` from the right offset.
    pub fn max_x_for(&self, width: u32) -> u32 {
        ((100.0 - self.right) / 100.0 * width as f64).round() as u32
    }

    /// `left + right`, which always equals `100 - width`.
    pub fn horizontal_coverage(&self) -> f64 {
        self.left + self.right
    }
}

/// Pixel margins trimmed from a detected span to exclude the bezel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BezelMargin {
    pub top: u32,
    pub bottom: u32,
}

impl Default for BezelMargin {
    fn default() -> Self {
        Self { top: 5, bottom: 5 }
    }
}

impl BezelMargin {
    /// Shrinks `(top, bottom)`; `None` when the margins leave no rows.
    pub fn apply(&self, (top, bottom): (u32, u32)) -> Option<(u32, u32)> {
        let top = top.checked_add(self.top)?;
        let bottom = bottom.checked_sub(self.bottom)?;
        (top <= bottom).then_some((top, bottom))
    }
}
