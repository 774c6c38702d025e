#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that previews, edits and transfers SolidGrid levels.

mod layout_transfer;
mod level;
mod preview;
mod script;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layout_transfer::GridLayoutSnapshot;
use level::LevelFile;
use preview::AsciiCanvas;
use solidgrid_core::EditorConfig;
use solidgrid_system_editor::{GridEditor, LoadOutcome};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the `solidgrid` binary.
#[derive(Debug, Parser)]
#[command(name = "solidgrid", version, about = "Autotiled occupancy grid editor")]
struct CliArgs {
    /// Raises the default log level to debug.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: CliCommand,
}

/// Subcommands exposed by the binary.
#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Prints the autotiled level as text.
    Preview {
        /// Level file to preview.
        #[arg(long)]
        level: PathBuf,
        /// Optional TOML editor configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Replays an intent script against a level and saves the result.
    Edit {
        /// Level file to start from; a missing file starts an empty level.
        /// The file is left untouched when the script changes no cells.
        #[arg(long)]
        level: PathBuf,
        /// Intent script to replay.
        #[arg(long)]
        script: PathBuf,
        /// Destination for the edited level; defaults to `--level`.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Optional TOML editor configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Prints a single-line layout transfer string for a level.
    Export {
        /// Level file to export.
        #[arg(long)]
        level: PathBuf,
    },
    /// Writes a level decoded from a layout transfer string.
    Import {
        /// Layout transfer string produced by `export`.
        #[arg(long)]
        layout: String,
        /// Destination level file.
        #[arg(long)]
        out: PathBuf,
    },
}

/// Entry point for the SolidGrid command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        CliCommand::Preview { level, config } => preview(&level, config.as_deref()),
        CliCommand::Edit {
            level,
            script,
            out,
            config,
        } => edit(&level, &script, out.as_deref(), config.as_deref()),
        CliCommand::Export { level } => export(&level),
        CliCommand::Import { layout, out } => import(&layout, &out),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        debug!("no config supplied; using defaults");
        return Ok(EditorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: EditorConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn open_editor(
    level: &LevelFile,
    config: &EditorConfig,
    canvas: &mut AsciiCanvas,
) -> Result<GridEditor> {
    let mut editor = GridEditor::new(config).context("failed to create editor")?;
    match editor.load(level.cells(), canvas) {
        LoadOutcome::Loaded { cells, refreshed } => {
            debug!(cells, refreshed, "level loaded");
        }
        LoadOutcome::Empty => info!("level is empty"),
    }
    Ok(editor)
}

fn preview(level_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let level = LevelFile::load(level_path)?;
    let mut canvas = AsciiCanvas::new();
    let _ = open_editor(&level, &config, &mut canvas)?;

    match canvas.render() {
        Some(text) => println!("{text}"),
        None => println!("(empty level)"),
    }
    Ok(())
}

fn edit(
    level_path: &Path,
    script_path: &Path,
    out_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let level = LevelFile::load_or_empty(level_path)?;
    let text = fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    let steps = script::parse(&text)
        .with_context(|| format!("failed to parse script {}", script_path.display()))?;

    let mut canvas = AsciiCanvas::new();
    let mut editor = open_editor(&level, &config, &mut canvas)?;
    let loaded_revision = editor.revision();
    let summary = script::replay(&mut editor, &steps, &mut canvas)
        .with_context(|| format!("failed to replay script {}", script_path.display()))?;

    info!(
        steps = steps.len(),
        edits = summary.edits,
        ignored = summary.ignored,
        refreshed = summary.refreshed,
        drawn = canvas.drawn(),
        "script replayed"
    );

    let destination = out_path.unwrap_or(level_path);
    if editor.revision() == loaded_revision && destination == level_path && level_path.exists() {
        info!(path = %level_path.display(), "no occupancy changes; level left untouched");
        println!("level {} unchanged", level_path.display());
        return Ok(());
    }
    let edited = LevelFile::from_cells(editor.all_occupied());
    edited.save(destination)?;
    println!(
        "{} solid cells written to {}",
        edited.cells.len(),
        destination.display()
    );
    Ok(())
}

fn export(level_path: &Path) -> Result<()> {
    let level = LevelFile::load(level_path)?;
    let encoded = GridLayoutSnapshot::new(level.cells())
        .encode()
        .context("failed to encode layout")?;
    println!("{encoded}");
    Ok(())
}

fn import(layout: &str, out_path: &Path) -> Result<()> {
    let snapshot = GridLayoutSnapshot::decode(layout).context("failed to decode layout")?;
    let level = LevelFile::from_cells(snapshot.cells.iter().copied());
    level.save(out_path)?;
    info!(cells = snapshot.cells.len(), path = %out_path.display(), "layout imported");
    Ok(())
}
