mod batch;
mod report;

use anyhow::{Context, Result, bail};
use batch::{Destination, FileStatus};
use clap::{ArgGroup, Args, Parser, Subcommand};
use log::{debug, warn};
use screen_locator::core_modules::{color_census, column_scan};
use screen_locator::{
    BezelMargin, Fallback, InscribedStrategy, LocatorConfig, Rgb, ScanMode, ScreenLocator, ThemeTable, load_grid,
};
use std::path::{Path, PathBuf};

const DEFAULT_IMAGE: &str = "assets/phone/phone_dark.png";
const DEFAULT_ASSETS: [&str; 4] = [
    "assets/phone/phone_dark.png",
    "assets/phone/phone_light.png",
    "assets/phone/phone_black.png",
    "assets/phone/phone_pink.png",
];

/// Find, measure and recolor the screen area of phone mockup images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON theme table to use instead of the builtin color variants
    #[arg(long = "themes", id = "theme_file", global = true)]
    theme_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bounding box of the screen color, as pixel bounds and layout percentages
    Detect(DetectArgs),
    /// Largest rectangle inside the screen region
    Inscribed(InscribedArgs),
    /// Vertical runs of the screen color along single columns
    Column(ColumnArgs),
    /// Most frequent greenish colors per image
    Census(CensusArgs),
    /// Colors at the standard probe points
    Sample(SampleArgs),
    /// Replace screen colors with one target color
    Remap(RemapArgs),
    /// Print the active theme table as JSON
    Themes,
}

#[derive(Args, Debug)]
struct DetectArgs {
    #[arg(default_value = DEFAULT_IMAGE)]
    image: PathBuf,
    #[arg(long, default_value = "dark")]
    theme: String,
    /// Sample every Nth row and column (partial recall, faster)
    #[arg(long)]
    stride: Option<u32>,
    /// Fraction of rows, from the top, to search
    #[arg(long, default_value_t = 1.0)]
    search_fraction: f64,
    /// Retry with a broad very-dark range when the theme color is absent
    #[arg(long)]
    fallback: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InscribedArgs {
    #[arg(default_value = DEFAULT_IMAGE)]
    image: PathBuf,
    #[arg(long, default_value = "dark")]
    theme: String,
    /// Use the exact histogram search instead of the centered border-sampled sweep
    #[arg(long)]
    exact: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ColumnArgs {
    #[arg(default_value = DEFAULT_IMAGE)]
    image: PathBuf,
    #[arg(long, default_value = "dark")]
    theme: String,
    /// Columns to scan; defaults to the center and 50 pixels either side
    #[arg(long = "x")]
    columns: Vec<u32>,
    /// Row sampling step for run detection
    #[arg(long, default_value_t = 10)]
    step: u32,
    /// Bezel margin trimmed from both ends, in pixels
    #[arg(long, default_value_t = 5)]
    margin: u32,
}

#[derive(Args, Debug)]
struct CensusArgs {
    /// Images to inspect; defaults to the four phone assets
    images: Vec<PathBuf>,
    #[arg(long, default_value_t = 5)]
    step: u32,
    #[arg(long, default_value_t = 5)]
    top: usize,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[arg(default_value = DEFAULT_IMAGE)]
    image: PathBuf,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("destination").required(true).args(["in_place", "output"])))]
struct RemapArgs {
    /// Images to recolor; defaults to the four phone assets
    images: Vec<PathBuf>,
    /// Themes whose colors are replaced; repeatable, defaults to all
    #[arg(long = "theme", id = "theme_names")]
    theme_names: Vec<String>,
    /// Replacement color as #rrggbb
    #[arg(long)]
    target: Option<Rgb>,
    /// Overwrite the source images
    #[arg(long)]
    in_place: bool,
    /// Write recolored images into this directory instead
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_themes(path: Option<&Path>) -> Result<ThemeTable> {
    match path {
        Some(path) => ThemeTable::from_path(path).with_context(|| format!("failed to load themes from {}", path.display())),
        None => Ok(ThemeTable::builtin()),
    }
}

fn image_list(images: Vec<PathBuf>) -> Vec<PathBuf> {
    if images.is_empty() {
        DEFAULT_ASSETS.iter().map(PathBuf::from).collect()
    } else {
        images
    }
}

fn open(path: &Path) -> Result<screen_locator::PixelGrid> {
    load_grid(path).with_context(|| format!("failed to open {}", path.display()))
}

fn detect(args: DetectArgs, themes: &ThemeTable) -> Result<()> {
    let config = LocatorConfig {
        predicate: themes.predicate(&args.theme)?,
        scan_mode: args.stride.map_or(ScanMode::Full, |step| ScanMode::Strided { step }),
        search_fraction: args.search_fraction,
        fallback: args.fallback.then(Fallback::default),
        ..LocatorConfig::default()
    };
    let locator = ScreenLocator::new(config)?;
    let grid = open(&args.image)?;
    let located = locator.locate(&grid)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&located)?);
        return Ok(());
    }

    let corners = located
        .screen()
        .map(|screen| color_census::corner_samples(&grid, &screen.bounding_box))
        .unwrap_or_default();
    print!("{}", report::detection(&args.image, &located, &corners));
    Ok(())
}

fn inscribed(args: InscribedArgs, themes: &ThemeTable) -> Result<()> {
    let config = LocatorConfig {
        predicate: themes.predicate(&args.theme)?,
        ..LocatorConfig::default()
    };
    let strategy = if args.exact {
        InscribedStrategy::Exact
    } else {
        InscribedStrategy::BorderSampled
    };
    let grid = open(&args.image)?;
    let found = ScreenLocator::new(config)?.inscribed(&grid, strategy)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    // Paint the style block with the screen's own color, read at the rectangle's center.
    let background = found
        .as_ref()
        .and_then(|r| {
            let center = r.rect.as_bounding_box().center();
            grid.get(center.x, center.y)
        })
        .map_or(themes.default_target, |p| p.rgb());
    print!("{}", report::inscribed(&args.image, found.as_ref(), background));
    Ok(())
}

/// The center column and the columns 50 pixels either side, when on the grid.
fn default_columns(width: u32) -> Vec<u32> {
    let center = width / 2;
    [center.checked_sub(50), Some(center), center.checked_add(50)]
        .into_iter()
        .flatten()
        .filter(|&x| x < width)
        .collect()
}

fn column(args: ColumnArgs, themes: &ThemeTable) -> Result<()> {
    let predicate = themes.predicate(&args.theme)?;
    let grid = open(&args.image)?;
    let margin = BezelMargin {
        top: args.margin,
        bottom: args.margin,
    };
    let columns = if args.columns.is_empty() {
        default_columns(grid.width())
    } else {
        args.columns
    };

    println!("Image size: {}x{}", grid.width(), grid.height());
    for x in columns {
        let runs = column_scan::column_runs(&grid, &predicate, x, args.step)?;
        let bounds = column_scan::column_bounds(&grid, &predicate, x, 1)?;
        let summary = report::ColumnSummary {
            x,
            width: grid.width(),
            height: grid.height(),
            runs: &runs,
            bounds,
            adjusted: bounds.and_then(|b| margin.apply(b)),
        };
        print!("{}", report::column(&summary));
    }
    Ok(())
}

fn census(args: CensusArgs) -> Result<()> {
    for path in image_list(args.images) {
        if !path.exists() {
            warn!("skipping {} (not found)", path.display());
            continue;
        }
        let grid = open(&path)?;
        let center = grid.get(grid.width() / 2, grid.height() / 3).map(|p| color_census::Sample {
            label: "Center",
            x: grid.width() / 2,
            y: grid.height() / 3,
            color: p.rgb(),
        });
        let found = color_census::greenish_census(&grid, args.step, args.top)?;
        print!("{}", report::census(&path, center.as_ref(), &found));
    }
    Ok(())
}

fn sample(args: SampleArgs) -> Result<()> {
    let grid = open(&args.image)?;
    println!("Image size: {}x{}", grid.width(), grid.height());
    println!("\nSampling colors from likely screen area (center-top region):");
    let mut out = String::new();
    report::samples(&mut out, &color_census::sample_points(&grid));
    print!("{out}");
    Ok(())
}

async fn remap(args: RemapArgs, themes: &ThemeTable) -> Result<()> {
    // --- 1. Plan & destination ---
    let plan = themes.remap_plan(&args.theme_names, args.target)?;
    let destination = match args.output {
        Some(dir) if !args.in_place => Destination::Directory(dir),
        _ => Destination::InPlace,
    };
    debug!("remap plan: {} rules -> {}", plan.rules.len(), plan.target);
    println!("Updating phone images to use screen color {}...\n", plan.target);

    // --- 2. Concurrent per-file processing ---
    let outcomes = batch::remap_files(image_list(args.images), plan, destination).await;

    // --- 3. Summary ---
    let mut total = 0usize;
    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.status {
            FileStatus::Updated { output, changed } => {
                total += changed;
                if *output == outcome.input {
                    println!("Updated {}: {} pixels changed", outcome.input.display(), changed);
                } else {
                    println!(
                        "Updated {} -> {}: {} pixels changed",
                        outcome.input.display(),
                        output.display(),
                        changed
                    );
                }
            }
            FileStatus::Skipped => println!("Skipping {} (not found)", outcome.input.display()),
            FileStatus::Failed(e) => {
                failures += 1;
                eprintln!("Failed {}: {:#}", outcome.input.display(), e);
            }
        }
    }
    println!("\nTotal pixels changed: {total}");

    if failures > 0 {
        bail!("{failures} of {} images could not be updated", outcomes.len());
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let themes = load_themes(cli.theme_file.as_deref())?;

    match cli.command {
        Command::Detect(args) => detect(args, &themes),
        Command::Inscribed(args) => inscribed(args, &themes),
        Command::Column(args) => column(args, &themes),
        Command::Census(args) => census(args),
        Command::Sample(args) => sample(args),
        Command::Remap(args) => remap(args, &themes).await,
        Command::Themes => {
            println!("{}", themes.to_json_string()?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Argument Parsing & Setup ---
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // --- 2. Dispatch ---
    run(cli).await
}
