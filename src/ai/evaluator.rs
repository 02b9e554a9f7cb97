use serde::{Deserialize, Serialize};

use crate::game::{is_stalemate, Grid, Symbol, WIN_LENGTH};

/// Score of a won position for the winner.
pub const WIN_SCORE: i32 = 1000;

/// Trait for scoring a grid from one symbol's point of view.
pub trait Evaluator {
    fn score(&self, grid: &Grid, perspective: Symbol) -> i32;
}

/// Weights for runs of four, three and two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunWeights {
    pub win: i32,
    pub three: i32,
    pub two: i32,
}

impl Default for RunWeights {
    fn default() -> Self {
        RunWeights {
            win: WIN_SCORE,
            three: 20,
            two: 5,
        }
    }
}

/// Counts runs of both symbols in every line and weighs them.
///
/// Runs are counted like substrings: a run of length `L` holds `L / n`
/// non-overlapping runs of length `n`, so a four also counts as a three and
/// two twos. A full grid with no four for either side is a tie worth 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCountEvaluator {
    weights: RunWeights,
}

impl RunCountEvaluator {
    pub fn new(weights: RunWeights) -> Self {
        RunCountEvaluator { weights }
    }

    pub fn weights(&self) -> RunWeights {
        self.weights
    }
}

impl Evaluator for RunCountEvaluator {
    fn score(&self, grid: &Grid, perspective: Symbol) -> i32 {
        let opponent = perspective.other();
        let (win, three, two) = (
            i64::from(self.weights.win),
            i64::from(self.weights.three),
            i64::from(self.weights.two),
        );
        let mut fours = 0;
        let mut score: i64 = 0;

        for line in grid.lines() {
            let runs = |symbol, length| line.count_runs(symbol, length) as i64;
            let (own_four, opp_four) = (runs(perspective, WIN_LENGTH), runs(opponent, WIN_LENGTH));
            fours += own_four + opp_four;

            score += win * (own_four - opp_four)
                + three * (runs(perspective, 3) - runs(opponent, 3))
                + two * (runs(perspective, 2) - runs(opponent, 2));
        }

        if fours == 0 && is_stalemate(grid) {
            return 0;
        }
        // Symmetric range so negating a score never overflows
        score.clamp(-i64::from(i32::MAX), i64::from(i32::MAX)) as i32
    }
}

/// Clamp a heuristic score strictly inside `±WIN_SCORE`, so no leaf
/// outranks a position that is actually won or lost.
pub fn bounded(score: i32) -> i32 {
    score.clamp(1 - WIN_SCORE, WIN_SCORE - 1)
}

/// Score `grid` for `perspective` with the default weights.
pub fn score(grid: &Grid, perspective: Symbol) -> i32 {
    RunCountEvaluator::default().score(grid, perspective)
}
