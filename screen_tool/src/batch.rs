// Batch recoloring across several asset files.
//
// Each file is independent, so each one becomes a blocking job on tokio's
// blocking pool, throttled to one job per CPU. Scanning itself stays
// single-threaded inside the library.

use anyhow::{Context, Result, anyhow};
use futures::future::join_all;
use log::{info, warn};
use screen_locator::core_modules::remapper;
use screen_locator::{LocatorError, RemapPlan, load_grid, save_grid};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Where recolored images are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Overwrite each source file. Destructive.
    InPlace,
    /// Write `<dir>/<file name>`, which must not be the source itself.
    Directory(PathBuf),
}

#[derive(Debug)]
pub enum FileStatus {
    Updated { output: PathBuf, changed: usize },
    Skipped,
    Failed(anyhow::Error),
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub status: FileStatus,
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Resolves the output path for `input`, refusing to clobber it unless
/// `Destination::InPlace` was asked for explicitly.
pub fn output_path(input: &Path, destination: &Destination) -> std::result::Result<PathBuf, LocatorError> {
    match destination {
        Destination::InPlace => Ok(input.to_path_buf()),
        Destination::Directory(dir) => {
            let name = input
                .file_name()
                .ok_or_else(|| LocatorError::WouldOverwrite(input.to_path_buf()))?;
            let output = dir.join(name);
            if same_file(&output, input) {
                return Err(LocatorError::WouldOverwrite(input.to_path_buf()));
            }
            Ok(output)
        }
    }
}

/// Maps each existing input whose output path is shared with another input to
/// that shared path. Such files are failed up front, since concurrent writers
/// would leave only one result on disk.
fn colliding_outputs(inputs: &[PathBuf], destination: &Destination) -> HashMap<PathBuf, PathBuf> {
    let mut by_output: HashMap<PathBuf, Vec<&PathBuf>> = HashMap::new();
    for input in inputs.iter().filter(|p| p.exists()) {
        if let Ok(output) = output_path(input, destination) {
            let key = output.canonicalize().unwrap_or(output);
            by_output.entry(key).or_default().push(input);
        }
    }

    by_output
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .flat_map(|(output, sources)| {
            sources
                .into_iter()
                .map(move |input| (input.clone(), output.clone()))
        })
        .collect()
}

fn remap_file(input: &Path, plan: &RemapPlan, destination: &Destination) -> Result<FileStatus> {
    if !input.exists() {
        warn!("skipping {} (not found)", input.display());
        return Ok(FileStatus::Skipped);
    }

    let output = output_path(input, destination)?;
    let grid = load_grid(input).with_context(|| format!("failed to read {}", input.display()))?;
    let outcome = remapper::remap(&grid, plan);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    save_grid(&output, &outcome.grid).with_context(|| format!("failed to write {}", output.display()))?;

    for (rule, count) in outcome.per_rule.iter().filter(|(_, count)| *count > 0) {
        info!("{}: {} pixels matched '{}'", input.display(), count, rule);
    }
    Ok(FileStatus::Updated {
        output,
        changed: outcome.changed_pixels,
    })
}

/// Recolors every file in `inputs`. Outcomes come back in input order.
pub async fn remap_files(inputs: Vec<PathBuf>, plan: RemapPlan, destination: Destination) -> Vec<FileOutcome> {
    let plan = Arc::new(plan);
    let destination = Arc::new(destination);
    let permits = Arc::new(Semaphore::new(num_cpus::get().max(1)));
    let collisions = colliding_outputs(&inputs, &destination);
    for (input, output) in &collisions {
        warn!("{} shares output {} with another input", input.display(), output.display());
    }

    let jobs = inputs.into_iter().map(|input| {
        let plan = Arc::clone(&plan);
        let destination = Arc::clone(&destination);
        let permits = Arc::clone(&permits);
        let collision = collisions.get(&input).cloned();
        async move {
            if let Some(output) = collision {
                let status = FileStatus::Failed(anyhow!(
                    "output {} would also be written by another input",
                    output.display()
                ));
                return FileOutcome { input, status };
            }

            let status = match permits.acquire_owned().await {
                Ok(permit) => {
                    let path = input.clone();
                    let job = tokio::task::spawn_blocking(move || {
                        let _permit = permit;
                        remap_file(&path, &plan, &destination)
                    });
                    match job.await {
                        Ok(Ok(status)) => status,
                        Ok(Err(e)) => FileStatus::Failed(e),
                        Err(e) => FileStatus::Failed(anyhow::Error::new(e).context("remap worker panicked")),
                    }
                }
                Err(e) => FileStatus::Failed(anyhow::Error::new(e)),
            };
            FileOutcome { input, status }
        }
    });

    join_all(jobs).await
}
