use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use lanemark_core::{CatalogError, LaneKey, LayoutConfig, LayoutEngine, layout_timeline, parse_catalog};
use notify::{Event, RecursiveMode, Watcher};
use serde::Serialize;

/// Editors write a file in several steps; events this close together are
/// one save.
const SAVE_DEBOUNCE: Duration = Duration::from_millis(800);

pub struct LayoutArgs {
    pub catalog: PathBuf,
    pub config: Option<PathBuf>,
    pub lane: Option<String>,
    pub pretty: bool,
    pub strict: bool,
}

pub fn check(path: &Path, watch: bool) -> Result<ExitCode> {
    if watch {
        return watch_catalog(path);
    }
    check_once(path)
}

fn check_once(path: &Path) -> Result<ExitCode> {
    let data = read(path)?;
    let mut out = std::io::stdout().lock();

    match parse_catalog(&data) {
        Ok(catalog) => {
            writeln!(
                out,
                "ok: {} records in {} lanes",
                catalog.records.len(),
                catalog.lanes.len()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(CatalogError::Invalid(issues)) => {
            writeln!(out, "{} problem(s) found:", issues.len())?;
            for issue in &issues {
                writeln!(out, "  - {issue}")?;
            }
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).with_context(|| format!("loading {}", path.display())),
    }
}

pub fn layout(args: &LayoutArgs) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => LayoutConfig::from_json(&read(path)?)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LayoutConfig::default(),
    };
    let engine = LayoutEngine::new(config)?;

    let catalog = parse_catalog(&read(&args.catalog)?)
        .with_context(|| format!("loading {}", args.catalog.display()))?;

    let forced = match &args.lane {
        Some(name) => {
            let Some(key) = LaneKey::parse(name) else {
                bail!("lane must look like \"Track::Sub track\", got {name:?}");
            };
            let Some(lane) = catalog.lane(&key) else {
                let known: Vec<String> = catalog.lane_keys().map(ToString::to_string).collect();
                bail!("no lane {key} (known: {})", known.join(", "));
            };
            let result = engine.layout(&lane.entries, &catalog.scale);
            emit(&result, args.pretty)?;
            result.diagnostics.forced
        }
        None => {
            let timeline = layout_timeline(&engine, &catalog.lanes, &catalog.scale);
            emit(&timeline, args.pretty)?;
            timeline.forced_overlaps()
        }
    };

    if args.strict && forced > 0 {
        tracing::error!(forced, "labels overlap");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

/// Re-run the check after every save until interrupted.
fn watch_catalog(path: &Path) -> Result<ExitCode> {
    let target = path
        .canonicalize()
        .with_context(|| format!("resolving {}", path.display()))?;
    let dir = target.parent().unwrap_or(Path::new("."));

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx).context("starting file watcher")?;
    // The directory, not the file: editors often replace the file on save.
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching {}", dir.display()))?;

    writeln!(std::io::stdout().lock(), "watching {} (Ctrl+C to stop)", path.display())?;
    report_check(&target);

    while let Ok(event) = rx.recv() {
        match event {
            Ok(event) if is_save_of(&event, &target) => {
                while rx.recv_timeout(SAVE_DEBOUNCE).is_ok() {}
                writeln!(std::io::stdout().lock(), "\n{} changed", path.display())?;
                report_check(&target);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "file watcher error"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn is_save_of(event: &Event, target: &Path) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == target.file_name())
}

/// A broken file is expected while editing; report and keep watching.
fn report_check(path: &Path) {
    if let Err(e) = check_once(path) {
        tracing::error!("{e:#}");
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn emit(value: &impl Serialize, pretty: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
