// THEORY:
// The `locator` module is the top-level API of the crate. It wraps the detector,
// the mask and the inscribed-rectangle search behind one configurable entry
// point, so a caller hands in a decoded frame and gets back a report it can
// print or serialize.
//
// The flow for a single image:
// 1.  **Primary search**: scan the configured part of the frame (optionally
//     strided) with the configured predicate.
// 2.  **Fallback** (optional): if nothing matched, rescan the full frame with a
//     broader predicate and accept the result only if enough pixels matched to
//     be a screen rather than noise. An empty primary result is not an error,
//     so this is the only place where a second pass happens.
// 3.  **Reporting**: convert the winning box into percentage offsets.

use crate::core_modules::bounding_box::{self, BoundingBox, ScanMode, SearchRegion};
use crate::core_modules::color_predicate::ColorPredicate;
use crate::core_modules::inscribed_rect::{self, InscribedRect, InscribedSearch, InscribedStrategy};
use crate::core_modules::layout::PercentLayout;
use crate::core_modules::match_mask::MatchMask;
use crate::core_modules::pixel_grid::pixel_grid::PixelGrid;
use crate::error::{LocatorError, Result};
use log::{debug, info};
use serde::Serialize;

/// Default minimum match count for the broad fallback to count as a screen.
const FALLBACK_MIN_PIXELS: usize = 100;

/// A broader second-chance search used when the primary predicate finds nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
    pub predicate: ColorPredicate,
    pub min_pixels: usize,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            predicate: ColorPredicate::very_dark(),
            min_pixels: FALLBACK_MIN_PIXELS,
        }
    }
}

/// Configuration for the ScreenLocator.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    pub predicate: ColorPredicate,
    pub scan_mode: ScanMode,
    /// Fraction of rows, from the top, that the primary search covers.
    /// `0.6` restricts the search to the upper 60% where phone screens sit.
    pub search_fraction: f64,
    pub fallback: Option<Fallback>,
    pub inscribed: InscribedSearch,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            predicate: ColorPredicate::dark_green(),
            scan_mode: ScanMode::Full,
            search_fraction: 1.0,
            fallback: None,
            inscribed: InscribedSearch::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Primary,
    Fallback,
}

/// Everything known about a located screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenData {
    pub image_width: u32,
    pub image_height: u32,
    pub bounding_box: BoundingBox,
    pub matched_pixels: usize,
    pub layout: PercentLayout,
    pub source: MatchSource,
}

/// The primary output of the locator for a single image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocatorReport {
    /// No pixel matched. A valid outcome, reported distinctly from failures.
    NotFound { visited_pixels: usize },
    Found(ScreenData),
}

impl LocatorReport {
    pub fn screen(&self) -> Option<&ScreenData> {
        match self {
            LocatorReport::Found(data) => Some(data),
            LocatorReport::NotFound { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InscribedReport {
    pub bounding_box: BoundingBox,
    pub rect: InscribedRect,
    pub layout: PercentLayout,
    pub matched_pixels: usize,
}

pub struct ScreenLocator {
    config: LocatorConfig,
}

impl ScreenLocator {
    pub fn new(config: LocatorConfig) -> Result<Self> {
        let fraction = config.search_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(LocatorError::InvalidFraction(fraction));
        }
        config.scan_mode.step()?;
        Ok(Self { config })
    }

    fn search_region(&self, grid: &PixelGrid) -> SearchRegion {
        if self.config.search_fraction >= 1.0 {
            SearchRegion::FullFrame
        } else {
            SearchRegion::TopRows((grid.height() as f64 * self.config.search_fraction) as u32)
        }
    }

    fn found(grid: &PixelGrid, bounding_box: BoundingBox, matched_pixels: usize, source: MatchSource) -> LocatorReport {
        LocatorReport::Found(ScreenData {
            image_width: grid.width(),
            image_height: grid.height(),
            bounding_box,
            matched_pixels,
            layout: PercentLayout::from_box(&bounding_box, grid.width(), grid.height()),
            source,
        })
    }

    pub fn locate(&self, grid: &PixelGrid) -> Result<LocatorReport> {
        // --- 1. Primary search ---
        let region = self.search_region(grid);
        let primary = bounding_box::detect(grid, &self.config.predicate, self.config.scan_mode, region)?;
        if let Some(bbox) = primary.bounding_box {
            return Ok(Self::found(grid, bbox, primary.matched_pixels, MatchSource::Primary));
        }

        // --- 2. Fallback ---
        let mut visited = primary.visited_pixels;
        if let Some(fallback) = &self.config.fallback {
            info!("primary color not found, trying broader fallback range");
            let broad = bounding_box::detect(grid, &fallback.predicate, ScanMode::Full, SearchRegion::FullFrame)?;
            visited += broad.visited_pixels;
            match broad.bounding_box {
                Some(bbox) if broad.matched_pixels > fallback.min_pixels => {
                    return Ok(Self::found(grid, bbox, broad.matched_pixels, MatchSource::Fallback));
                }
                _ => debug!(
                    "fallback matched {} pixels, below the {} needed",
                    broad.matched_pixels, fallback.min_pixels
                ),
            }
        }

        Ok(LocatorReport::NotFound { visited_pixels: visited })
    }

    /// Largest rectangle inside the matched region, over the full frame.
    pub fn inscribed(&self, grid: &PixelGrid, strategy: InscribedStrategy) -> Result<Option<InscribedReport>> {
        let mask = MatchMask::build(grid, &self.config.predicate);
        let Some(bbox) = mask.bounding_box() else {
            return Ok(None);
        };

        let rect = match strategy {
            InscribedStrategy::BorderSampled => inscribed_rect::border_sampled(&mask, &bbox, &self.config.inscribed)?,
            InscribedStrategy::Exact => inscribed_rect::exact(&mask),
        };

        Ok(rect.map(|rect| InscribedReport {
            bounding_box: bbox,
            rect,
            layout: PercentLayout::from_box(&rect.as_bounding_box(), grid.width(), grid.height()),
            matched_pixels: mask.matched(),
        }))
    }
}
