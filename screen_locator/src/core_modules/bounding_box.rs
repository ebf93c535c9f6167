// THEORY:
// The bounding-box detector is the core of the locator. It answers one question
// about a frame: what is the tightest axis-aligned box around every pixel the
// predicate accepts?
//
// Key principles:
// 1.  **Reduction, not search**: the scan folds a running min/max over every
//     visited match and never stops early, so the visit order cannot change the
//     result. The box touches a match on each of its four edges.
// 2.  **Empty is a result**: when nothing matches, the detector reports `None`.
//     A box at (0,0) is never invented to stand in for "nothing".
// 3.  **Sampling under-approximates**: a strided scan visits a uniform lattice of
//     pixels. It can only miss boundary matches, so its box is always contained
//     in the full-scan box and may be smaller.
// 4.  **Stateless utility**: the detector has no memory between calls.

use crate::core_modules::color_predicate::ColorPredicate;
use crate::core_modules::pixel_grid::pixel_grid::PixelGrid;
use crate::error::{LocatorError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// A simple struct to represent a 2D pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Inclusive pixel bounds of a matched region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// A box around a single pixel.
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grows the box to cover `(x, y)`.
    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Number of pixel columns covered, counting both edges.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Number of pixel rows covered, counting both edges.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// `max_x - min_x`, the extent used by the percentage layout.
    pub fn span_x(&self) -> u32 {
        self.max_x - self.min_x
    }

    /// `max_y - min_y`.
    pub fn span_y(&self) -> u32 {
        self.max_y - self.min_y
    }

    /// Integer centroid, rounded down.
    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2,
            y: (self.min_y + self.max_y) / 2,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// True when `other` lies entirely inside `self`.
    pub fn encloses(&self, other: &BoundingBox) -> bool {
        self.contains(other.min_x, other.min_y) && self.contains(other.max_x, other.max_y)
    }
}

/// How densely the detector samples the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Every pixel exactly once.
    #[default]
    Full,
    /// Every `step`-th column of every `step`-th row, starting at (0, 0).
    /// Recall is partial: the box can shrink, never grow.
    Strided { step: u32 },
}

impl ScanMode {
    pub fn step(self) -> Result<u32> {
        match self {
            ScanMode::Full => Ok(1),
            ScanMode::Strided { step: 0 } => Err(LocatorError::InvalidStride),
            ScanMode::Strided { step } => Ok(step),
        }
    }
}

/// The part of the frame the detector looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchRegion {
    #[default]
    FullFrame,
    /// Only rows `0..rows`.
    TopRows(u32),
}

impl SearchRegion {
    fn row_limit(self, height: u32) -> u32 {
        match self {
            SearchRegion::FullFrame => height,
            SearchRegion::TopRows(rows) => rows.min(height),
        }
    }
}

/// The result of one detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// `None` when no visited pixel matched.
    pub bounding_box: Option<BoundingBox>,
    pub matched_pixels: usize,
    pub visited_pixels: usize,
}

impl Detection {
    pub fn is_found(&self) -> bool {
        self.bounding_box.is_some()
    }
}

/// Folds matching coordinates into a box. Order of `include` calls is irrelevant.
#[derive(Debug, Default, Clone)]
pub struct BoxAccumulator {
    bounding_box: Option<BoundingBox>,
    matched: usize,
}

impl BoxAccumulator {
    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.matched += 1;
        match &mut self.bounding_box {
            Some(bbox) => bbox.include(x, y),
            None => self.bounding_box = Some(BoundingBox::at(x, y)),
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    pub fn matched(&self) -> usize {
        self.matched
    }
}

/// Scans `grid` and returns the tight box around pixels accepted by `predicate`.
pub fn detect(
    grid: &PixelGrid,
    predicate: &ColorPredicate,
    mode: ScanMode,
    region: SearchRegion,
) -> Result<Detection> {
    let step = mode.step()? as usize;
    let rows = region.row_limit(grid.height());

    let mut acc = BoxAccumulator::default();
    let mut visited = 0usize;

    for y in (0..rows).step_by(step) {
        for x in (0..grid.width()).step_by(step) {
            visited += 1;
            if let Some(pixel) = grid.get(x, y) {
                if predicate.matches(pixel) {
                    acc.include(x, y);
                }
            }
        }
    }

    debug!(
        "detect: visited {} of {}x{} pixels (step {}, rows {}), matched {}",
        visited,
        grid.width(),
        grid.height(),
        step,
        rows,
        acc.matched()
    );

    Ok(Detection {
        bounding_box: acc.bounding_box(),
        matched_pixels: acc.matched(),
        visited_pixels: visited,
    })
}

/// Full-frame, full-density detection.
pub fn detect_full(grid: &PixelGrid, predicate: &ColorPredicate) -> Detection {
    let mut acc = BoxAccumulator::default();
    for (x, y, pixel) in grid.iter_coords() {
        if predicate.matches(pixel) {
            acc.include(x, y);
        }
    }
    Detection {
        bounding_box: acc.bounding_box(),
        matched_pixels: acc.matched(),
        visited_pixels: grid.pixels().len(),
    }
}
