// THEORY:
// This file is the main entry point for the `screen_locator` library crate. It
// exports the `ScreenLocator` and its associated data structures
// (`LocatorConfig`, `LocatorReport`, etc.) as the high-level interface, plus the
// remapper and theme table for recoloring assets.
//
// Everything here is synchronous and works on an in-memory `PixelGrid`. Decoding
// and encoding files is confined to `image_io`, so the scanning code can be
// exercised with synthetic grids alone.

pub mod core_modules;
pub mod error;
pub mod image_io;
pub mod locator;
pub mod theme;

pub use crate::core_modules::bounding_box::{BoundingBox, Detection, ScanMode, SearchRegion};
pub use crate::core_modules::color_predicate::{ChannelRange, ColorPredicate};
pub use crate::core_modules::inscribed_rect::{InscribedRect, InscribedSearch, InscribedStrategy};
pub use crate::core_modules::layout::{BezelMargin, PercentLayout};
pub use crate::core_modules::pixel::pixel::{Pixel, Rgb};
pub use crate::core_modules::pixel_grid::pixel_grid::{ChannelLayout, PixelGrid};
pub use crate::core_modules::remapper::{RemapOutcome, RemapPlan, RemapRule};
pub use crate::error::{LocatorError, Result};
pub use crate::image_io::image_io::{load_grid, save_grid};
pub use crate::locator::{
    Fallback, InscribedReport, LocatorConfig, LocatorReport, MatchSource, ScreenData, ScreenLocator,
};
pub use crate::theme::{Theme, ThemeTable};
