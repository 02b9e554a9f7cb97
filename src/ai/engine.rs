use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::evaluator::{RunCountEvaluator, RunWeights};
use super::heuristic::tactical_move;
use super::minimax::{Minimax, DEFAULT_DEPTH};
use super::random::random_move;
use crate::error::SearchError;
use crate::game::{Grid, Symbol};

/// Computer playing strength.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal column
    Random,
    /// Win, block, or avoid handing over a win
    Heuristic,
    /// Alpha-beta minimax over the run-count evaluation
    Minimax,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Random,
        Difficulty::Heuristic,
        Difficulty::Minimax,
    ];

    /// Numeric tier, 1 through 3.
    pub fn tier(self) -> u8 {
        match self {
            Difficulty::Random => 1,
            Difficulty::Heuristic => 2,
            Difficulty::Minimax => 3,
        }
    }

    pub fn from_tier(tier: u8) -> Option<Difficulty> {
        Difficulty::ALL.into_iter().find(|d| d.tier() == tier)
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Random => "random",
            Difficulty::Heuristic => "heuristic",
            Difficulty::Minimax => "minimax",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Search settings, loadable from the `[search]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimax depth in plies
    pub depth: usize,
    /// Stop deepening after this many milliseconds
    pub time_budget_ms: Option<u64>,
    /// Fixed RNG seed for reproducible games
    pub seed: Option<u64>,
    pub weights: RunWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            time_budget_ms: None,
            seed: None,
            weights: RunWeights::default(),
        }
    }
}

/// Dispatches move requests to the tier asked for. Owns the RNG shared by
/// the random and heuristic tiers.
pub struct SearchEngine {
    rng: StdRng,
    minimax: Minimax,
}

impl SearchEngine {
    pub fn new(config: &SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let evaluator = Box::new(RunCountEvaluator::new(config.weights));
        let mut minimax = Minimax::with_evaluator(config.depth, evaluator);
        if let Some(ms) = config.time_budget_ms {
            minimax = minimax.with_time_budget(Duration::from_millis(ms));
        }
        SearchEngine { rng, minimax }
    }

    pub fn minimax(&self) -> &Minimax {
        &self.minimax
    }

    /// Choose a legal column for `acting`.
    ///
    /// The grid may be modified during the search but is returned exactly
    /// as it was passed in.
    pub fn choose_move(
        &mut self,
        grid: &mut Grid,
        acting: Symbol,
        difficulty: Difficulty,
    ) -> Result<usize, SearchError> {
        let column = match difficulty {
            Difficulty::Random => random_move(grid, &mut self.rng)?,
            Difficulty::Heuristic => tactical_move(grid, acting, &mut self.rng)?,
            Difficulty::Minimax => self.minimax.search(grid, acting)?.column,
        };
        debug!(%acting, %difficulty, column, "computer chose move");
        Ok(column)
    }
}
