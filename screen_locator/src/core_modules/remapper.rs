// THEORY:
// The remapper rewrites every screen-colored pixel to one target color so that
// all phone assets share a single screen tone. It is the only transform in the
// crate that produces new pixel data.
//
// Key principles:
// 1.  **Any-of membership**: rules are tried in order and the first match wins
//     the attribution, but a pixel is replaced at most once per pass.
// 2.  **Alpha is sacred**: only the color components change. Transparent
//     corners of the mockup keep their exact alpha.
// 3.  **Copy by default**: `remap` returns a new grid and leaves the input
//     untouched. `remap_in_place` is there for callers that already own a copy.
//     Writing the result back over the source asset is a decision for the
//     caller, not for this module.

use crate::core_modules::color_predicate::ColorPredicate;
use crate::core_modules::pixel::pixel::{Pixel, Rgb};
use crate::core_modules::pixel_grid::pixel_grid::PixelGrid;
use log::debug;

/// One named membership test in a remap pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RemapRule {
    pub name: String,
    pub predicate: ColorPredicate,
}

/// Ordered rules that all map to the same `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemapPlan {
    pub rules: Vec<RemapRule>,
    pub target: Rgb,
}

impl RemapPlan {
    pub fn single(name: impl Into<String>, predicate: ColorPredicate, target: Rgb) -> Self {
        Self {
            rules: vec![RemapRule {
                name: name.into(),
                predicate,
            }],
            target,
        }
    }

    /// Index of the first rule that accepts `pixel`.
    #[inline]
    pub fn first_match(&self, pixel: &Pixel) -> Option<usize> {
        self.rules.iter().position(|rule| rule.predicate.matches(pixel))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemapOutcome {
    pub grid: PixelGrid,
    pub changed_pixels: usize,
    /// `(rule name, pixels attributed to it)`, in rule order.
    pub per_rule: Vec<(String, usize)>,
}

fn apply(pixels: &mut [Pixel], plan: &RemapPlan) -> Vec<usize> {
    let mut per_rule = vec![0usize; plan.rules.len()];
    for pixel in pixels.iter_mut() {
        if let Some(rule) = plan.first_match(pixel) {
            *pixel = pixel.with_rgb(plan.target);
            per_rule[rule] += 1;
        }
    }
    per_rule
}

/// Returns a recolored copy of `grid`.
pub fn remap(grid: &PixelGrid, plan: &RemapPlan) -> RemapOutcome {
    let mut output = grid.clone();
    let per_rule = apply(output.pixels_mut(), plan);
    let changed_pixels = per_rule.iter().sum();
    debug!("remap: {} pixels changed to {}", changed_pixels, plan.target);

    RemapOutcome {
        grid: output,
        changed_pixels,
        per_rule: plan
            .rules
            .iter()
            .map(|rule| rule.name.clone())
            .zip(per_rule)
            .collect(),
    }
}

/// Recolors `grid` directly and returns how many pixels changed.
pub fn remap_in_place(grid: &mut PixelGrid, plan: &RemapPlan) -> usize {
    apply(grid.pixels_mut(), plan).iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_grid::pixel_grid::ChannelLayout;

    const TARGET: Rgb = Rgb::new(155, 188, 15);

    fn screen_grid(layout: ChannelLayout) -> PixelGrid {
        let mut grid = PixelGrid::filled(100, 100, layout, Pixel::opaque(0, 0, 0));
        grid.fill_rect(20, 30, 60, 45, Pixel::opaque(87, 159, 42));
        grid
    }

    fn dark_plan() -> RemapPlan {
        RemapPlan::single("dark", ColorPredicate::dark_green(), TARGET)
    }

    #[test]
    fn screen_block_is_recolored() {
        let source = screen_grid(ChannelLayout::Rgb);
        let outcome = remap(&source, &dark_plan());

        assert_eq!(outcome.changed_pixels, 656);
        assert_eq!(outcome.per_rule, vec![("dark".to_string(), 656)]);
        for (x, y, pixel) in outcome.grid.iter_coords() {
            let inside = (20..=60).contains(&x) && (30..=45).contains(&y);
            let expected = if inside {
                Pixel::opaque(155, 188, 15)
            } else {
                Pixel::opaque(0, 0, 0)
            };
            assert_eq!(*pixel, expected, "pixel ({x}, {y})");
        }

        // Input is untouched.
        assert_eq!(source.get(20, 30), Some(&Pixel::opaque(87, 159, 42)));
    }

    #[test]
    fn remap_is_idempotent() {
        let once = remap(&screen_grid(ChannelLayout::Rgb), &dark_plan());
        let twice = remap(&once.grid, &dark_plan());
        assert_eq!(twice.grid, once.grid);
        assert_eq!(twice.changed_pixels, 0);
    }

    #[test]
    fn idempotent_when_target_is_inside_a_rule() {
        let plan = RemapPlan {
            rules: vec![
                RemapRule {
                    name: "dark".into(),
                    predicate: ColorPredicate::dark_green(),
                },
                RemapRule {
                    name: "nokia".into(),
                    predicate: ColorPredicate::nokia_lcd(),
                },
            ],
            target: TARGET,
        };
        let once = remap(&screen_grid(ChannelLayout::Rgb), &plan);
        let twice = remap(&once.grid, &plan);
        assert_eq!(twice.grid, once.grid);
        // Re-matched under the nokia rule but written with the same color.
        assert_eq!(twice.per_rule[1].1, 656);
    }

    #[test]
    fn alpha_survives_remapping() {
        let mut source = screen_grid(ChannelLayout::Rgba);
        for (i, pixel) in source.pixels_mut().iter_mut().enumerate() {
            pixel.alpha = (i % 256) as u8;
        }
        let outcome = remap(&source, &dark_plan());
        for (before, after) in source.pixels().iter().zip(outcome.grid.pixels()) {
            assert_eq!(before.alpha, after.alpha);
        }
        assert_eq!(outcome.changed_pixels, 656);
    }

    #[test]
    fn overlapping_rules_replace_once() {
        let wide = ColorPredicate::from_bounds((0, 255), (150, 165), (0, 255)).unwrap();
        let plan = RemapPlan {
            rules: vec![
                RemapRule {
                    name: "dark".into(),
                    predicate: ColorPredicate::dark_green(),
                },
                RemapRule {
                    name: "wide".into(),
                    predicate: wide,
                },
            ],
            target: TARGET,
        };
        let outcome = remap(&screen_grid(ChannelLayout::Rgb), &plan);
        assert_eq!(outcome.changed_pixels, 656);
        assert_eq!(outcome.per_rule[0].1, 656);
        assert_eq!(outcome.per_rule[1].1, 0);
    }

    #[test]
    fn in_place_matches_copying_remap() {
        let mut grid = screen_grid(ChannelLayout::Rgb);
        let copied = remap(&grid, &dark_plan());
        let changed = remap_in_place(&mut grid, &dark_plan());
        assert_eq!(changed, copied.changed_pixels);
        assert_eq!(grid, copied.grid);
    }
}
