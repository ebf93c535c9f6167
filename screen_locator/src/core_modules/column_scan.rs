// Single-column probes. Scanning one vertical line through the screen is far
// cheaper than a full-frame pass and is how the vertical extent is confirmed
// against the bezel.

use crate::core_modules::color_predicate::ColorPredicate;
use crate::core_modules::pixel::pixel::{Pixel, Rgb};
use crate::core_modules::pixel_grid::pixel_grid::PixelGrid;
use crate::error::{LocatorError, Result};

/// A contiguous stretch of matching samples along a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// First sampled row that matched.
    pub start: u32,
    /// First sampled row after `start` that did not match. `None` when the run
    /// is still open at the bottom edge.
    pub end: Option<u32>,
    pub start_color: Rgb,
    pub end_color: Option<Rgb>,
}

fn column_samples<'a>(
    grid: &'a PixelGrid,
    x: u32,
    step: u32,
) -> Result<impl Iterator<Item = (u32, &'a Pixel)> + 'a> {
    if x >= grid.width() {
        return Err(LocatorError::ColumnOutOfBounds { x, width: grid.width() });
    }
    if step == 0 {
        return Err(LocatorError::InvalidStride);
    }
    Ok((0..grid.height())
        .step_by(step as usize)
        .filter_map(move |y| grid.get(x, y).map(|p| (y, p))))
}

/// First and last matching row in column `x`, sampling every `step` rows.
pub fn column_bounds(grid: &PixelGrid, predicate: &ColorPredicate, x: u32, step: u32) -> Result<Option<(u32, u32)>> {
    let mut bounds: Option<(u32, u32)> = None;
    for (y, pixel) in column_samples(grid, x, step)? {
        if predicate.matches(pixel) {
            bounds = Some(match bounds {
                Some((top, _)) => (top, y),
                None => (y, y),
            });
        }
    }
    Ok(bounds)
}

/// Every enter/leave transition of the predicate along column `x`.
pub fn column_runs(grid: &PixelGrid, predicate: &ColorPredicate, x: u32, step: u32) -> Result<Vec<Run>> {
    let mut runs: Vec<Run> = Vec::new();
    let mut open: Option<Run> = None;

    for (y, pixel) in column_samples(grid, x, step)? {
        let hit = predicate.matches(pixel);
        let color = pixel.rgb();
        match (open.take(), hit) {
            (None, true) => {
                open = Some(Run {
                    start: y,
                    end: None,
                    start_color: color,
                    end_color: None,
                })
            }
            (Some(mut run), false) => {
                run.end = Some(y);
                run.end_color = Some(color);
                runs.push(run);
            }
            (still_open, _) => open = still_open,
        }
    }

    runs.extend(open);
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_grid::pixel_grid::ChannelLayout;

    fn striped() -> PixelGrid {
        let mut grid = PixelGrid::filled(10, 100, ChannelLayout::Rgb, Pixel::opaque(0, 0, 0));
        grid.fill_rect(0, 20, 9, 49, Pixel::opaque(87, 159, 42));
        grid.fill_rect(0, 70, 9, 99, Pixel::opaque(87, 159, 42));
        grid
    }

    #[test]
    fn bounds_cover_first_and_last_match() {
        let bounds = column_bounds(&striped(), &ColorPredicate::dark_green(), 5, 1).unwrap();
        assert_eq!(bounds, Some((20, 99)));
    }

    #[test]
    fn sampled_bounds_stay_inside() {
        let bounds = column_bounds(&striped(), &ColorPredicate::dark_green(), 5, 10).unwrap();
        assert_eq!(bounds, Some((20, 90)));
    }

    #[test]
    fn runs_report_transitions() {
        let runs = column_runs(&striped(), &ColorPredicate::dark_green(), 0, 10).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (20, Some(50)));
        assert_eq!(runs[0].start_color, Rgb::new(87, 159, 42));
        assert_eq!(runs[0].end_color, Some(Rgb::new(0, 0, 0)));
        assert_eq!((runs[1].start, runs[1].end), (70, None));
    }

    #[test]
    fn no_match_in_column() {
        let grid = PixelGrid::filled(4, 4, ChannelLayout::Rgb, Pixel::default());
        let predicate = ColorPredicate::dark_green();
        assert_eq!(column_bounds(&grid, &predicate, 1, 1).unwrap(), None);
        assert!(column_runs(&grid, &predicate, 1, 1).unwrap().is_empty());
    }

    #[test]
    fn bad_column_or_step_is_an_error() {
        let grid = striped();
        let predicate = ColorPredicate::dark_green();
        assert!(matches!(
            column_bounds(&grid, &predicate, 10, 1),
            Err(LocatorError::ColumnOutOfBounds { x: 10, width: 10 })
        ));
        assert!(matches!(
            column_runs(&grid, &predicate, 0, 0),
            Err(LocatorError::InvalidStride)
        ));
    }
}
