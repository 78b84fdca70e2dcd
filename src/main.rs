//! A sidebar folder tree rendered as nested accordions.
//!
//! Which folders are expanded is persisted under a storage key, so the tree
//! reopens the way it was left.  Run with a JSON tree file, or without one
//! to browse the built-in calendar sidebar.

mod app;
mod config;
mod core;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::app::{
    event::{self, AppEvent},
    handler,
    state::AppState,
};
use crate::core::{
    accordion::{AccordionController, AccordionProps},
    node::{self, FIND_SHARES_ID},
    store::{JsonFileStore, KeyValueStore, MemoryStore},
};
use crate::ui::{accordion_widget::AccordionWidget, layout::AppLayout, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Folder sidebar with persisted accordions")]
struct Cli {
    /// JSON folder tree (array of `{id, name, children}`); defaults to a demo tree.
    tree: Option<PathBuf>,

    /// Key under which expansion state is persisted.
    #[arg(long, default_value = "sidebar-accordion")]
    storage_key: String,

    /// Expansion store file (overrides `store_path` in the config file).
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep expansion state in memory only.
    #[arg(long)]
    no_persist: bool,

    /// Folder expanded on first run (repeatable).  Ignored once state exists.
    #[arg(long = "expanded", value_name = "ID")]
    expanded: Vec<String>,

    /// Folder initially marked as current.
    #[arg(long)]
    selected: Option<String>,

    /// Node id replaced by the "find shares" action.
    #[arg(long, default_value = FIND_SHARES_ID)]
    override_id: String,

    /// Log file for `RUST_LOG` output; defaults to the state directory.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Send tracing output to `path`.  The terminal belongs to the TUI, so
/// nothing is ever written to stdout or stderr while it runs.
fn init_logging(path: &Path) {
    let file = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| OpenOptions::new().create(true).append(true).open(path));
    let writer = match file {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(io::sink),
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(writer)
        .init();
}

fn open_store(cli: &Cli, config: &config::AppConfig) -> Box<dyn KeyValueStore> {
    if cli.no_persist {
        return Box::new(MemoryStore::new());
    }
    let path = config::resolve_store_path(cli.store.as_deref(), config);
    match JsonFileStore::open(&path) {
        Ok(store) => {
            tracing::debug!("persisting expansion state to {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("{e}; expansion state will not persist this session");
            Box::new(MemoryStore::new())
        }
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Only emits when RUST_LOG is set.
    init_logging(&cli.log_file.clone().unwrap_or_else(config::default_log_path));

    // ── folder tree & accordion ───────────────────────────────
    let roots = match &cli.tree {
        Some(path) => node::load_tree(path)
            .with_context(|| format!("loading folder tree from {}", path.display()))?,
        None => node::demo_tree(),
    };
    let user_config = config::AppConfig::load();
    if !config::config_path().exists() {
        // Write the defaults once so there is a file to edit.
        if let Err(e) = user_config.save() {
            tracing::warn!("could not write default config: {e}");
        }
    }
    let store = open_store(&cli, &user_config);

    let mut props = AccordionProps::new(cli.storage_key.clone()).override_id(cli.override_id.clone());
    if !cli.expanded.is_empty() {
        props = props.initial_expanded(cli.expanded.clone());
    }

    let (tx, mut events) = event::channel();
    let select_tx = tx.clone();
    let accordion = AccordionController::mount(store, props).on_select(move |id| {
        let _ = select_tx.send(AppEvent::Selected(id.to_string()));
    });

    if let Some(id) = cli.selected.as_deref() {
        if node::find_in(&roots, id).is_none() {
            tracing::warn!("selected folder `{id}` is not in the tree");
        }
    }

    let mut state = AppState::new(roots, accordion, user_config);
    state.selected = cli.selected.clone();
    state.override_line = Some(Line::from(vec![Span::styled(
        "+ Find shares",
        Theme::override_style(),
    )]));

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout_handle = stdout();
    execute!(stdout_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    state.terminal_area = ratatui::layout::Rect::new(0, 0, size.width, size.height);

    event::spawn_terminal_reader(tx, Duration::from_millis(250));

    // ── event loop ────────────────────────────────────────────
    loop {
        let rows = state.render_pass();
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            let block = Block::default()
                .title(format!(" {} ", state.accordion.storage_key()))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());

            frame.render_stateful_widget(
                AccordionWidget::new(&rows).block(block),
                layout.sidebar_area,
                &mut state.widget_state,
            );

            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        let Some(event) = events.recv().await else {
            break;
        };
        handler::handle_event(&mut state, event);

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::debug!(
        expanded = state.accordion.expansion().len(),
        "exiting"
    );
    Ok(())
}
