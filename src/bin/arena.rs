use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use connect_four::ai::{Difficulty, SearchEngine};
use connect_four::arena::Arena;
use connect_four::config::AppConfig;
use connect_four::game::Symbol;

/// Pit two computer difficulties against each other.
#[derive(Parser)]
#[command(name = "arena", about = "Play computer-vs-computer Connect Four rounds")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Difficulty playing X
    #[arg(long, value_enum, default_value_t = Difficulty::Minimax)]
    x: Difficulty,

    /// Difficulty playing O
    #[arg(long, value_enum, default_value_t = Difficulty::Heuristic)]
    o: Difficulty,

    /// Override minimax search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Seed the random number generator
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()?;

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(rounds) = cli.rounds {
        config.arena.rounds = rounds;
    }
    if let Some(depth) = cli.depth {
        config.search.depth = depth;
    }
    if cli.seed.is_some() {
        config.search.seed = cli.seed;
    }
    config.validate().context("invalid settings")?;

    let rounds = config.arena.rounds;
    let window = config.arena.window;
    let engine = SearchEngine::new(&config.search);
    let mut arena = Arena::new(engine, cli.x, cli.o, config.arena);
    let metrics = arena.run(rounds).context("arena round failed")?;

    println!("-------------------------------------------");
    println!("X ({}) vs O ({}), {} rounds", cli.x, cli.o, metrics.total_rounds());
    println!(
        "X wins: {}  O wins: {}  draws: {}",
        metrics.wins(Symbol::X),
        metrics.wins(Symbol::O),
        metrics.draws()
    );
    println!(
        "Last {} rounds: X {:.1}%  O {:.1}%  draws {:.1}%  avg length {:.1}",
        window.min(metrics.total_rounds()),
        metrics.win_rate(Symbol::X, window) * 100.0,
        metrics.win_rate(Symbol::O, window) * 100.0,
        metrics.draw_rate(window) * 100.0,
        metrics.average_round_length(window)
    );
    Ok(())
}
