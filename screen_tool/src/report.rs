// Human-readable output. Every function returns a `String` so the exact text can
// be tested; `main` only prints.

use screen_locator::core_modules::column_scan::Run;
use screen_locator::core_modules::color_census::{Census, Sample};
use screen_locator::{BoundingBox, InscribedReport, LocatorReport, MatchSource, PercentLayout, Rgb};
use std::fmt::Write;
use std::path::Path;

const RULE: &str = "============================================================";

fn banner(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{RULE}\n{title}\n{RULE}");
}

/// A percentage layout block in React Native style syntax.
pub fn style_block(layout: &PercentLayout, background: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "phoneScreenArea: {{");
    let _ = writeln!(out, "  position: 'absolute',");
    let _ = writeln!(out, "  top: '{:.2}%',", layout.top);
    let _ = writeln!(out, "  left: '{:.2}%',", layout.left);
    let _ = writeln!(out, "  right: '{:.2}%',", layout.right);
    let _ = writeln!(out, "  height: '{:.2}%',", layout.height);
    let _ = writeln!(out, "  backgroundColor: '{background}',");
    let _ = writeln!(out, "  overflow: 'hidden',");
    let _ = write!(out, "}},");
    out
}

pub fn samples(out: &mut String, samples: &[Sample]) {
    for sample in samples {
        let c = sample.color;
        let _ = writeln!(
            out,
            "  {} ({}, {}): RGB({}, {}, {}) = {}",
            sample.label, sample.x, sample.y, c.red, c.green, c.blue, c
        );
    }
}

fn bounds(out: &mut String, bbox: &BoundingBox) {
    let _ = writeln!(
        out,
        "Bounds: ({}, {}) to ({}, {})",
        bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
    );
    let _ = writeln!(out, "Size: {}px x {}px", bbox.span_x(), bbox.span_y());
}

pub fn detection(path: &Path, report: &LocatorReport, corner_samples: &[Sample]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analyzing {}...", path.display());

    let Some(screen) = report.screen() else {
        let _ = writeln!(out, "No screen area found.");
        return out;
    };

    let kind = match screen.source {
        MatchSource::Primary => "Screen",
        MatchSource::Fallback => "Dark area (fallback range)",
    };
    let _ = writeln!(out, "{kind} found! {} pixels detected", screen.matched_pixels);
    bounds(&mut out, &screen.bounding_box);
    let _ = writeln!(out, "Image size: {}x{}", screen.image_width, screen.image_height);

    banner(&mut out, "REACT NATIVE STYLES (exact minimal rectangle):");
    let _ = writeln!(out, "{}", style_block(&screen.layout, "transparent"));

    let layout = &screen.layout;
    let _ = writeln!(out, "\nVerification:");
    let _ = writeln!(
        out,
        "  Width: {:.2}% (left {:.2}% + right {:.2}% = {:.2}%)",
        layout.width,
        layout.left,
        layout.right,
        layout.horizontal_coverage()
    );
    let _ = writeln!(out, "  Should equal: {:.2}%", 100.0 - layout.width);

    let _ = writeln!(out, "\nCenter: ({:.2}%, {:.2}%)", layout.center_x, layout.center_y);
    let _ = writeln!(out, "Size: {:.2}% x {:.2}%", layout.width, layout.height);

    if !corner_samples.is_empty() {
        let _ = writeln!(out, "\nSample pixels from detected area:");
        samples(&mut out, corner_samples);
    }
    out
}

pub fn inscribed(path: &Path, report: Option<&InscribedReport>, background: Rgb) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analyzing {}...", path.display());

    let Some(report) = report else {
        let _ = writeln!(out, "Could not find a valid rectangle!");
        return out;
    };

    let _ = writeln!(out, "Found {} matching pixels", report.matched_pixels);
    let bbox = &report.bounding_box;
    let _ = writeln!(
        out,
        "Matched area bounds: ({}, {}) to ({}, {})",
        bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
    );

    let rect = &report.rect;
    banner(&mut out, "MAXIMAL INSCRIBED RECTANGLE:");
    let _ = writeln!(out, "Top-left: ({}, {})", rect.left, rect.top);
    let _ = writeln!(out, "Bottom-right: ({}, {})", rect.right, rect.bottom);
    let _ = writeln!(out, "Size: {}px x {}px", rect.right - rect.left, rect.bottom - rect.top);
    let _ = writeln!(out, "Area: {}px²", rect.area);

    banner(&mut out, "REACT NATIVE STYLES:");
    let _ = writeln!(out, "{}", style_block(&report.layout, &background.to_string()));
    out
}

pub struct ColumnSummary<'a> {
    pub x: u32,
    pub width: u32,
    pub height: u32,
    pub runs: &'a [Run],
    pub bounds: Option<(u32, u32)>,
    pub adjusted: Option<(u32, u32)>,
}

pub fn column(summary: &ColumnSummary<'_>) -> String {
    let mut out = String::new();
    let pct = |y: u32| y as f64 / summary.height as f64 * 100.0;

    banner(
        &mut out,
        &format!(
            "Scanning at x={} ({:.1}%)",
            summary.x,
            summary.x as f64 / summary.width as f64 * 100.0
        ),
    );
    for run in summary.runs {
        let c = run.start_color;
        let _ = writeln!(out, ">>> SCREEN STARTS at y={} ({:.2}%)", run.start, pct(run.start));
        let _ = writeln!(out, "    RGB({}, {}, {})", c.red, c.green, c.blue);
        if let (Some(end), Some(c)) = (run.end, run.end_color) {
            let _ = writeln!(out, "<<< SCREEN ENDS at y={} ({:.2}%)", end, pct(end));
            let _ = writeln!(out, "    RGB({}, {}, {})", c.red, c.green, c.blue);
            let span = end - run.start;
            let _ = writeln!(out, "    Screen height: {}px ({:.2}%)", span, pct(span));
        }
    }

    let Some((top, bottom)) = summary.bounds else {
        let _ = writeln!(out, "No screen found!");
        return out;
    };
    banner(&mut out, "RECOMMENDATION:");
    let _ = writeln!(out, "Detected screen (with bezel):");
    let _ = writeln!(out, "  top: '{:.2}%'", pct(top));
    let _ = writeln!(out, "  height: '{:.2}%'", pct(bottom - top));
    match summary.adjusted {
        Some((top, bottom)) => {
            let _ = writeln!(out, "Adjusted screen (usable area, excluding bezel):");
            let _ = writeln!(out, "  top: '{:.2}%'", pct(top));
            let _ = writeln!(out, "  height: '{:.2}%'", pct(bottom - top));
        }
        None => {
            let _ = writeln!(out, "Bezel margins leave no usable area.");
        }
    }
    out
}

pub fn census(path: &Path, center: Option<&Sample>, census: &Census) -> String {
    let mut out = String::new();
    banner(&mut out, &format!("Analyzing: {}", path.display()));
    if let Some(sample) = center {
        let _ = writeln!(out, "Center sample ({}, {}):", sample.x, sample.y);
        let c = sample.color;
        let _ = writeln!(out, "  RGB({}, {}, {}) = {}", c.red, c.green, c.blue, c);
    }
    if census.distinct == 0 {
        let _ = writeln!(out, "\nNo greenish colors found.");
    } else {
        let _ = writeln!(out, "\nFound {} greenish colors:", census.distinct);
        for (c, count) in &census.top {
            let _ = writeln!(
                out,
                "  RGB({}, {}, {}) = {} ({} samples)",
                c.red, c.green, c.blue, c, count
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use screen_locator::{LocatorConfig, Pixel, PixelGrid, ChannelLayout, ScreenLocator};

    fn locate_block() -> LocatorReport {
        let mut grid = PixelGrid::filled(100, 100, ChannelLayout::Rgb, Pixel::opaque(0, 0, 0));
        grid.fill_rect(20, 30, 60, 45, Pixel::opaque(87, 159, 42));
        ScreenLocator::new(LocatorConfig::default())
            .unwrap()
            .locate(&grid)
            .unwrap()
    }

    #[test]
    fn style_block_uses_two_decimals() {
        let report = locate_block();
        let block = style_block(&report.screen().unwrap().layout, "transparent");
        assert!(block.contains("  top: '30.00%',"));
        assert!(block.contains("  left: '20.00%',"));
        assert!(block.contains("  right: '40.00%',"));
        assert!(block.contains("  height: '15.00%',"));
        assert!(block.ends_with("},"));
    }

    #[test]
    fn detection_report_lists_bounds() {
        let text = detection(Path::new("phone.png"), &locate_block(), &[]);
        assert!(text.contains("Screen found! 656 pixels detected"));
        assert!(text.contains("Bounds: (20, 30) to (60, 45)"));
        assert!(text.contains("Image size: 100x100"));
        assert!(text.contains("  Width: 40.00% (left 20.00% + right 40.00% = 60.00%)"));
        assert!(text.contains("  Should equal: 60.00%"));
    }

    #[test]
    fn not_found_is_reported_distinctly() {
        let report = LocatorReport::NotFound { visited_pixels: 10 };
        let text = detection(Path::new("phone.png"), &report, &[]);
        assert!(text.contains("No screen area found."));
        assert!(!text.contains("phoneScreenArea"));
    }

    #[test]
    fn census_prints_hex_and_distinct_total() {
        let found = Census {
            distinct: 12,
            top: vec![(Rgb::new(155, 188, 15), 3)],
        };
        let text = census(Path::new("a.png"), None, &found);
        assert!(text.contains("Found 12 greenish colors:"));
        assert!(text.contains("RGB(155, 188, 15) = #9bbc0f (3 samples)"));
    }
}
