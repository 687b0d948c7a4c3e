//! usertable binary entry point.
//!
//! Parses the command line, loads the config files, initializes the terminal
//! in raw mode, runs the TUI event loop and restores the terminal on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use usertable::app::{self, AppState, Config};
use usertable::store::MockStore;

/// Browse, filter, sort and edit a table of (mock) user records.
#[derive(Parser, Debug)]
#[command(name = "usertable", author, version, about, long_about = None)]
struct Cli {
    /// Number of mock users to generate
    #[arg(short, long, env = "USERTABLE_RECORDS")]
    records: Option<usize>,

    /// Rows per page
    #[arg(short, long)]
    page_size: Option<usize>,

    /// RNG seed for reproducible mock data
    #[arg(long, env = "USERTABLE_SEED")]
    seed: Option<u64>,

    /// Directory holding theme.conf, keybinds.conf and settings.conf
    #[arg(long, env = "USERTABLE_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Write logs to this file (the terminal belongs to the TUI)
    #[arg(long, env = "USERTABLE_LOG")]
    log_file: Option<PathBuf>,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let dir = app::config_dir(cli.config_dir.as_deref());
    let mut config = Config::load(&dir);
    if let Some(n) = cli.records {
        config.settings.record_count = n;
    }
    if let Some(n) = cli.page_size {
        config.settings.page_size = n.max(1);
    }
    if cli.seed.is_some() {
        config.settings.seed = cli.seed;
    }
    tracing::info!(config_dir = %dir.display(), settings = ?config.settings, "starting");

    let store = MockStore::new(config.settings.mock_options());
    let mut state = AppState::new(Box::new(store), config);

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = &res {
        tracing::error!(%err, "application error");
    }
    res
}
