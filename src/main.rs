use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use connect_four::ai::SearchEngine;
use connect_four::config::{AppConfig, ControllerKind};
use connect_four::game::Session;
use connect_four::ui::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against people or the computer")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Name of the X player
    #[arg(long)]
    x: Option<String>,

    /// Name of the O player
    #[arg(long)]
    o: Option<String>,

    /// Who controls X
    #[arg(long, value_enum)]
    x_level: Option<ControllerKind>,

    /// Who controls O
    #[arg(long, value_enum)]
    o_level: Option<ControllerKind>,

    /// Override minimax search depth
    #[arg(long)]
    depth: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(name) = cli.x {
        config.players.x_name = name;
    }
    if let Some(name) = cli.o {
        config.players.o_name = name;
    }
    if let Some(kind) = cli.x_level {
        config.players.x = kind;
    }
    if let Some(kind) = cli.o_level {
        config.players.o = kind;
    }
    if let Some(depth) = cli.depth {
        config.search.depth = depth;
    }
    config.validate().context("invalid settings")?;

    let (x, o) = config.players.build();
    let engine = SearchEngine::new(&config.search);
    let mut app = App::new(
        Session::new(x, o),
        engine,
        Duration::from_millis(config.ui.computer_delay_ms),
    );

    run_tui(&mut app).context("terminal error")
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()?;
    Ok(())
}

fn run_tui(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
