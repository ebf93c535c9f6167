// THEORY:
// Once the screen's bounding box is known, layout code often wants the largest
// rectangle that sits *inside* the matched region, since rounded screen corners
// and bezel shadows make the tight box slightly too generous.
//
// Two strategies are offered:
// 1.  **Border-sampled sweep** (`border_sampled`): a brute-force sweep over
//     (width, height) candidates centered on the box centroid. A candidate is
//     accepted when its corners and a fixed number of evenly spaced points on
//     each edge are matched pixels. The best area seen over the whole sweep wins.
//     KNOWN LIMITATION: this is a heuristic. Interior pixels and unsampled edge
//     points are never tested, so a region with holes or notches between sample
//     points can yield a rectangle that is not fully inside the matched set.
// 2.  **Exact** (`exact`): the classic largest-rectangle-in-a-binary-matrix
//     algorithm (per-row histograms plus a monotonic stack), O(width × height).
//     Every pixel of the returned rectangle is matched, but it is not forced to be
//     centered on the centroid.
//
// The sweep costs O((span_x / step) × (span_y / step) × edge_samples) membership
// tests, so it stays bounded by the configured step rather than by pixel count.

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::match_mask::MatchMask;
use crate::error::{LocatorError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Tunables for the border-sampled sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InscribedSearch {
    /// Smallest candidate width and height tried.
    pub min_size: u32,
    /// Increment between successive candidate widths and heights.
    pub step: u32,
    /// Divisor for the edge sampling stride (`max(1, side / edge_samples)`).
    pub edge_samples: u32,
}

impl Default for InscribedSearch {
    fn default() -> Self {
        Self {
            min_size: 10,
            step: 2,
            edge_samples: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InscribedStrategy {
    #[default]
    BorderSampled,
    Exact,
}

/// An inscribed rectangle with inclusive pixel edges.
///
/// For the sweep, `area` is the candidate's nominal `width × height`, where the
/// nominal width is `right - left`. For the exact strategy it is the number of
/// pixels covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InscribedRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub area: u64,
}

impl InscribedRect {
    pub fn as_bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_x: self.left,
            min_y: self.top,
            max_x: self.right,
            max_y: self.bottom,
        }
    }
}

/// Centered candidate edges in signed space; validation rejects anything off-grid.
struct Candidate {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl Candidate {
    fn centered(cx: i64, cy: i64, width: i64, height: i64) -> Self {
        Self {
            left: cx - width / 2,
            right: cx + width / 2,
            top: cy - height / 2,
            bottom: cy + height / 2,
        }
    }

    fn border_inside(&self, mask: &MatchMask, width: i64, height: i64, edge_samples: i64) -> bool {
        let corners = [
            (self.left, self.top),
            (self.right, self.top),
            (self.left, self.bottom),
            (self.right, self.bottom),
        ];
        if !corners.iter().all(|&(x, y)| mask.contains(x, y)) {
            return false;
        }

        let x_stride = (width / edge_samples).max(1) as usize;
        let horizontal = (self.left..=self.right)
            .step_by(x_stride)
            .all(|x| mask.contains(x, self.top) && mask.contains(x, self.bottom));
        if !horizontal {
            return false;
        }

        let y_stride = (height / edge_samples).max(1) as usize;
        (self.top..=self.bottom)
            .step_by(y_stride)
            .all(|y| mask.contains(self.left, y) && mask.contains(self.right, y))
    }
}

/// Border-sampled sweep centered on `bbox`'s centroid. See module notes for the
/// heuristic's limits.
pub fn border_sampled(mask: &MatchMask, bbox: &BoundingBox, search: &InscribedSearch) -> Result<Option<InscribedRect>> {
    if search.step == 0 {
        return Err(LocatorError::InvalidStride);
    }
    let step = search.step as usize;
    let edge_samples = search.edge_samples.max(1) as i64;
    let center = bbox.center();
    let (cx, cy) = (center.x as i64, center.y as i64);

    let mut best: Option<InscribedRect> = None;
    let mut candidates = 0u64;

    for width in (search.min_size..=bbox.span_x()).step_by(step) {
        for height in (search.min_size..=bbox.span_y()).step_by(step) {
            candidates += 1;
            let (w, h) = (width as i64, height as i64);
            let candidate = Candidate::centered(cx, cy, w, h);
            if !candidate.border_inside(mask, w, h, edge_samples) {
                continue;
            }

            let area = width as u64 * height as u64;
            if best.is_none_or(|b| area > b.area) {
                // Accepted candidates passed the corner test, so every edge is on the grid.
                best = Some(InscribedRect {
                    left: candidate.left as u32,
                    top: candidate.top as u32,
                    right: candidate.right as u32,
                    bottom: candidate.bottom as u32,
                    area,
                });
            }
        }
    }

    debug!("border_sampled: tried {} candidates, best {:?}", candidates, best);
    Ok(best)
}

/// Largest all-matched rectangle anywhere in the mask.
pub fn exact(mask: &MatchMask) -> Option<InscribedRect> {
    let width = mask.width() as usize;
    let mut heights = vec![0u32; width];
    let mut best: Option<InscribedRect> = None;
    let mut stack: Vec<usize> = Vec::with_capacity(width + 1);

    for y in 0..mask.height() {
        for (h, &hit) in heights.iter_mut().zip(mask.row(y)) {
            *h = if hit { *h + 1 } else { 0 };
        }

        // Monotonic stack over the histogram; index `width` is a zero sentinel.
        stack.clear();
        for x in 0..=width {
            let current = if x < width { heights[x] } else { 0 };
            while let Some(&top) = stack.last() {
                if heights[top] <= current {
                    break;
                }
                stack.pop();
                let bar = heights[top];
                let left = stack.last().map_or(0, |&i| i + 1);
                let span = (x - left) as u32;
                let area = span as u64 * bar as u64;
                if best.is_none_or(|b| area > b.area) {
                    best = Some(InscribedRect {
                        left: left as u32,
                        top: y + 1 - bar,
                        right: left as u32 + span - 1,
                        bottom: y,
                        area,
                    });
                }
            }
            stack.push(x);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize) -> Vec<Vec<bool>> {
        vec![vec![true; width]; height]
    }

    fn mask_of(rows: &[Vec<bool>]) -> MatchMask {
        let slices: Vec<&[bool]> = rows.iter().map(Vec::as_slice).collect();
        MatchMask::from_rows(&slices)
    }

    #[test]
    fn solid_region_sweep_takes_the_largest_candidate() {
        // 41 x 31 solid block: spans are 40 and 30, both even, so the final
        // candidate fills the box exactly.
        let mask = mask_of(&solid(41, 31));
        let bbox = mask.bounding_box().unwrap();
        let rect = border_sampled(&mask, &bbox, &InscribedSearch::default()).unwrap().unwrap();

        assert_eq!(rect.left, 0);
        assert_eq!(rect.top, 0);
        assert_eq!(rect.right, 40);
        assert_eq!(rect.bottom, 30);
        assert_eq!(rect.area, 40 * 30);
    }

    #[test]
    fn best_area_wins_over_first_valid() {
        // A plus-shaped region: a wide short bar and a tall narrow bar. The
        // sweep meets the small candidates first but must report the widest bar.
        let mut rows = vec![vec![false; 61]; 61];
        for (y, row) in rows.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let in_wide = (18..=42).contains(&y);
                let in_tall = (25..=35).contains(&x);
                *cell = in_wide || in_tall;
            }
        }
        let mask = mask_of(&rows);
        let bbox = mask.bounding_box().unwrap();
        let rect = border_sampled(&mask, &bbox, &InscribedSearch::default()).unwrap().unwrap();

        // Widest valid candidate is 60 x 24 (height bounded by the wide bar).
        assert_eq!(rect.area, 60 * 24);
        assert_eq!((rect.left, rect.right), (0, 60));
        assert_eq!((rect.top, rect.bottom), (18, 42));
    }

    #[test]
    fn too_small_region_yields_nothing() {
        let mask = mask_of(&solid(8, 8));
        let bbox = mask.bounding_box().unwrap();
        assert_eq!(border_sampled(&mask, &bbox, &InscribedSearch::default()).unwrap(), None);
    }

    #[test]
    fn zero_step_is_rejected() {
        let mask = mask_of(&solid(20, 20));
        let bbox = mask.bounding_box().unwrap();
        let search = InscribedSearch {
            step: 0,
            ..InscribedSearch::default()
        };
        assert!(matches!(
            border_sampled(&mask, &bbox, &search),
            Err(LocatorError::InvalidStride)
        ));
    }

    #[test]
    fn sweep_accepts_interior_hole_but_exact_does_not() {
        // Solid 41 x 41 with one unmatched pixel at the centroid. Border sampling
        // never looks inside, so the full-size candidate is still accepted.
        let mut rows = solid(41, 41);
        rows[20][20] = false;
        let mask = mask_of(&rows);
        let bbox = mask.bounding_box().unwrap();

        let sampled = border_sampled(&mask, &bbox, &InscribedSearch::default()).unwrap().unwrap();
        assert!(sampled.as_bounding_box().contains(20, 20));

        let exact = exact(&mask).unwrap();
        assert!(!exact.as_bounding_box().contains(20, 20));
        // The largest hole-free piece is a 41 x 20 half.
        assert_eq!(exact.area, 41 * 20);
    }

    #[test]
    fn exact_finds_offset_rectangle() {
        let mut rows = vec![vec![false; 12]; 9];
        for row in rows.iter_mut().skip(2).take(4) {
            for cell in row.iter_mut().skip(3).take(7) {
                *cell = true;
            }
        }
        // A stray match that must not join the rectangle.
        rows[8][0] = true;
        let rect = exact(&mask_of(&rows)).unwrap();
        assert_eq!(
            rect,
            InscribedRect {
                left: 3,
                top: 2,
                right: 9,
                bottom: 5,
                area: 28
            }
        );
    }

    #[test]
    fn exact_on_empty_mask_is_none() {
        assert_eq!(exact(&mask_of(&vec![vec![false; 4]; 3])), None);
    }
}
