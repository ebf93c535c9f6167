// Color inventory helpers used when tuning a new theme: which screen-like
// colors exist in an asset, and what sits at the usual probe points.

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::pixel::pixel::{Pixel, Rgb};
use crate::core_modules::pixel_grid::pixel_grid::PixelGrid;
use crate::error::{LocatorError, Result};
use std::collections::HashMap;

/// A labelled color probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub label: &'static str,
    pub x: u32,
    pub y: u32,
    pub color: Rgb,
}

/// Green-dominant and reasonably bright.
pub fn is_greenish(pixel: &Pixel) -> bool {
    pixel.green > pixel.red && pixel.green > pixel.blue && pixel.green > 100
}

/// Greenish colors found on a sampling lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Census {
    /// Distinct greenish colors seen, before truncation.
    pub distinct: usize,
    /// The most frequent colors with their sample counts, most frequent first.
    pub top: Vec<(Rgb, usize)>,
}

/// Counts greenish colors on a `step` lattice and keeps the `top_n` most
/// frequent. Equal counts are ordered by color.
pub fn greenish_census(grid: &PixelGrid, step: u32, top_n: usize) -> Result<Census> {
    if step == 0 {
        return Err(LocatorError::InvalidStride);
    }

    let mut counts: HashMap<Rgb, usize> = HashMap::new();
    for y in (0..grid.height()).step_by(step as usize) {
        for x in (0..grid.width()).step_by(step as usize) {
            if let Some(pixel) = grid.get(x, y).filter(|p| is_greenish(p)) {
                *counts.entry(pixel.rgb()).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(Rgb, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let distinct = ranked.len();
    ranked.truncate(top_n);
    Ok(Census { distinct, top: ranked })
}

fn probe(grid: &PixelGrid, label: &'static str, x: i64, y: i64) -> Option<Sample> {
    let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
    grid.get(x, y).map(|p| Sample {
        label,
        x,
        y,
        color: p.rgb(),
    })
}

/// The standard probe points in the upper-center region where phone screens sit.
/// Points off the grid are skipped.
pub fn sample_points(grid: &PixelGrid) -> Vec<Sample> {
    let cx = (grid.width() / 2) as i64;
    let quarter = (grid.height() / 4) as i64;
    let third = (grid.height() / 3) as i64;
    [
        ("Center top", cx, quarter),
        ("Center upper-mid", cx, third),
        ("Left of center top", cx - 50, quarter),
        ("Right of center top", cx + 50, quarter),
    ]
    .into_iter()
    .filter_map(|(label, x, y)| probe(grid, label, x, y))
    .collect()
}

/// Colors at a box's corners and centroid, for verifying a detection by eye.
pub fn corner_samples(grid: &PixelGrid, bbox: &BoundingBox) -> Vec<Sample> {
    let center = bbox.center();
    [
        ("Top-left corner", bbox.min_x, bbox.min_y),
        ("Top-right corner", bbox.max_x, bbox.min_y),
        ("Bottom-left corner", bbox.min_x, bbox.max_y),
        ("Bottom-right corner", bbox.max_x, bbox.max_y),
        ("Center", center.x, center.y),
    ]
    .into_iter()
    .filter_map(|(label, x, y)| probe(grid, label, x as i64, y as i64))
    .collect()
}
