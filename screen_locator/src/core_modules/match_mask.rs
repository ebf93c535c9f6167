use crate::core_modules::bounding_box::{BoundingBox, BoxAccumulator};
use crate::core_modules::color_predicate::ColorPredicate;
use crate::core_modules::pixel_grid::pixel_grid::PixelGrid;

/// The set of pixels a predicate accepted, stored as a dense membership grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    matched: usize,
    bounding_box: Option<BoundingBox>,
}

impl MatchMask {
    /// One full scan of `grid`.
    pub fn build(grid: &PixelGrid, predicate: &ColorPredicate) -> Self {
        let mut acc = BoxAccumulator::default();
        let cells = grid
            .iter_coords()
            .map(|(x, y, pixel)| {
                let hit = predicate.matches(pixel);
                if hit {
                    acc.include(x, y);
                }
                hit
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
            matched: acc.matched(),
            bounding_box: acc.bounding_box(),
        }
    }

    /// Builds a mask straight from rows of booleans, mostly for tests.
    pub fn from_rows(rows: &[&[bool]]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let mut acc = BoxAccumulator::default();
        let mut cells = Vec::with_capacity((width * height) as usize);
        for (y, row) in rows.iter().enumerate() {
            for x in 0..width as usize {
                let hit = row.get(x).copied().unwrap_or(false);
                if hit {
                    acc.include(x as u32, y as u32);
                }
                cells.push(hit);
            }
        }
        Self {
            width,
            height,
            cells,
            matched: acc.matched(),
            bounding_box: acc.bounding_box(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    /// Membership test. Anything off the grid, negative coordinates included,
    /// is outside the set.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    pub(crate) fn row(&self, y: u32) -> &[bool] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::pixel_grid::pixel_grid::ChannelLayout;

    #[test]
    fn mask_tracks_count_and_box() {
        let mut grid = PixelGrid::filled(8, 6, ChannelLayout::Rgba, Pixel::default());
        grid.fill_rect(2, 1, 4, 3, Pixel::opaque(87, 159, 42));
        let mask = MatchMask::build(&grid, &ColorPredicate::dark_green());

        assert_eq!(mask.matched(), 9);
        assert_eq!(
            mask.bounding_box(),
            Some(BoundingBox {
                min_x: 2,
                min_y: 1,
                max_x: 4,
                max_y: 3
            })
        );
        assert!(mask.contains(3, 2));
        assert!(!mask.contains(1, 1));
        assert!(!mask.contains(-1, 2));
        assert!(!mask.contains(8, 0));
    }

    #[test]
    fn empty_mask_has_no_box() {
        let mask = MatchMask::from_rows(&[&[false, false], &[false, false]]);
        assert!(mask.is_empty());
        assert_eq!(mask.bounding_box(), None);
    }
}
