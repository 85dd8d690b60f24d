// ABOUTME: Main entry point for the panedeck CLI
// Previews presets and saved layouts, manages the layout store and dry-runs restores

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use panedeck::components::LayoutPreviewComponent;
use panedeck::config::AppConfig;
use panedeck::layout::{LayoutNode, Preset, SavedLayout};
use panedeck::models::SessionHandle;
use panedeck::store::{LayoutStore, NamedLayout};
use panedeck::tab::{LayoutHistory, RestoreSummary, TabSnapshot, TabState};

#[derive(Parser)]
#[command(name = "panedeck", version, about = "Split-pane layouts for terminal sessions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in presets
    Presets,
    /// Draw a preset, or a saved layout file with --file
    Preview {
        preset: Option<Preset>,
        #[arg(long, conflicts_with = "preset")]
        file: Option<PathBuf>,
    },
    /// Manage saved layouts
    Layouts {
        #[command(subcommand)]
        action: LayoutsAction,
    },
    /// Apply a saved layout to a pool of sessions and show the result
    Restore {
        name: String,
        /// JSON array of sessions
        #[arg(long)]
        sessions: PathBuf,
        /// Keep the saved pane ids instead of issuing fresh ones
        #[arg(long)]
        snapshot: bool,
    },
}

#[derive(Subcommand)]
enum LayoutsAction {
    List,
    Show { name: String },
    Delete { name: String },
    /// Store a saved layout JSON file under a name
    Import {
        name: String,
        file: PathBuf,
        #[arg(long)]
        shortcut: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    setup_logging(&config)?;
    setup_panic_handler();

    if let Err(e) = run(cli.command, &config) {
        error!("Command failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(command: Command, config: &AppConfig) -> Result<()> {
    let preview = LayoutPreviewComponent::new(config.preview_width, config.preview_height);
    match command {
        Command::Presets => {
            for preset in Preset::ALL {
                let marker = if preset == config.default_preset { " (default)" } else { "" };
                println!("{:<10} {} panes{}", preset.name(), preset.pane_count(), marker);
            }
        }
        Command::Preview { preset, file } => {
            if let Some(path) = file {
                let saved = read_saved_layout(&path)?;
                print!("{}", preview.render_saved(&saved));
            } else {
                let mut tab = TabState::new();
                tab.apply_preset(preset.unwrap_or(config.default_preset));
                print!("{}", preview.render_live(tab.layout(), &[], Some(tab.active_pane())));
            }
        }
        Command::Layouts { action } => {
            let store = LayoutStore::open(&config.layouts_dir)?;
            run_layouts(action, &store, &preview)?;
        }
        Command::Restore { name, sessions, snapshot } => {
            let store = LayoutStore::open(&config.layouts_dir)?;
            let Some(record) = store.find_by_name(&name)? else {
                bail!("No saved layout named '{}'", name);
            };
            let pool = read_session_pool(&sessions)?;
            let mut tab = TabState::with_history(LayoutHistory::new(config.history_depth));
            let summary = if snapshot {
                let saved = TabSnapshot {
                    active_pane_id: record.layout.first_pane_id(),
                    layout: record.layout,
                    zoomed_pane_id: None,
                };
                tab.restore_snapshot(&saved, &pool)
            } else {
                tab.apply_template(&record.layout, &pool)
            };
            print!("{}", preview.render_live(tab.layout(), &pool, Some(tab.active_pane())));
            print_summary(tab.layout(), &summary);
        }
    }
    Ok(())
}

fn run_layouts(action: LayoutsAction, store: &LayoutStore, preview: &LayoutPreviewComponent) -> Result<()> {
    match action {
        LayoutsAction::List => {
            for record in store.list()? {
                let shortcut = record.shortcut.as_deref().unwrap_or("-");
                println!(
                    "{:<20} {:>2} panes  shortcut {:<6} saved {}",
                    record.name,
                    record.layout.pane_count(),
                    shortcut,
                    record.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        LayoutsAction::Show { name } => {
            let Some(record) = store.find_by_name(&name)? else {
                bail!("No saved layout named '{}'", name);
            };
            print!("{}", preview.render_saved(&record.layout));
        }
        LayoutsAction::Delete { name } => {
            store.delete(&name)?;
            println!("Deleted layout '{}'", name);
        }
        LayoutsAction::Import { name, file, shortcut } => {
            let saved = read_saved_layout(&file)?;
            let mut record = NamedLayout::new(name, saved);
            if let Some(shortcut) = shortcut {
                record = record.with_shortcut(shortcut);
            }
            let record = store.save(record)?;
            println!("Saved layout '{}' ({} panes)", record.name, record.layout.pane_count());
        }
    }
    Ok(())
}

fn read_saved_layout(path: &Path) -> Result<SavedLayout> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
    let saved: SavedLayout = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse layout file: {}", path.display()))?;
    saved
        .validate()
        .with_context(|| format!("Invalid layout in {}", path.display()))?;
    Ok(saved)
}

fn read_session_pool(path: &Path) -> Result<Vec<SessionHandle>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sessions file: {}", path.display()))?;
    let pool: Vec<SessionHandle> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse sessions file: {}", path.display()))?;
    info!("Loaded {} sessions from {}", pool.len(), path.display());
    Ok(pool)
}

fn print_summary(layout: &LayoutNode, summary: &RestoreSummary) {
    println!("{} panes, {} bound", layout.pane_count(), layout.bound_sessions().len());
    if !summary.unmatched.is_empty() {
        let panes: Vec<String> = summary.unmatched.iter().map(ToString::to_string).collect();
        println!("No session found for panes: {}", panes.join(", "));
    }
    if !summary.displaced.is_empty() {
        let sessions: Vec<String> = summary.displaced.iter().map(ToString::to_string).collect();
        println!("Displaced sessions: {}", sessions.join(", "));
    }
}

fn setup_logging(config: &AppConfig) -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {}", config.log_dir.display()))?;

    let log_file = config.log_dir.join("panedeck.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .init();
    Ok(())
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
