use std::time::{Duration, Instant};

use tracing::debug;

use super::evaluator::{bounded, Evaluator, RunCountEvaluator, WIN_SCORE};
use crate::error::{MoveError, SearchError};
use crate::game::{has_four_in_a_row, is_stalemate, Grid, Symbol};

/// Search depth in plies used when nothing else is configured.
pub const DEFAULT_DEPTH: usize = 6;

/// Result of a minimax search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub column: usize,
    pub score: i32,
    /// Depth of the deepest completed iteration.
    pub depth: usize,
    pub nodes: u64,
}

/// Depth-limited minimax with alpha-beta pruning.
///
/// Wins score `WIN_SCORE` no matter how deep they are found, so a slow
/// forced win ties with a fast one and the lower column is kept. Among
/// equal scores the first column in index order wins. Leaf evaluations are
/// clamped inside `±WIN_SCORE`, so a heuristic never outranks a real win.
pub struct Minimax {
    depth: usize,
    time_budget: Option<Duration>,
    evaluator: Box<dyn Evaluator>,
}

impl Minimax {
    pub fn new(depth: usize) -> Self {
        Self::with_evaluator(depth, Box::new(RunCountEvaluator::default()))
    }

    pub fn with_evaluator(depth: usize, evaluator: Box<dyn Evaluator>) -> Self {
        Minimax {
            depth: depth.max(1),
            time_budget: None,
            evaluator,
        }
    }

    /// Search depth 1, 2, ... and stop deepening once `budget` has passed.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Find the best column for `acting`. The grid is left as it was found.
    pub fn search(&self, grid: &mut Grid, acting: Symbol) -> Result<SearchReport, SearchError> {
        let fallback = *grid
            .legal_columns()
            .first()
            .ok_or(SearchError::NoLegalMove)?;

        let Some(budget) = self.time_budget else {
            return self
                .run(grid, acting, self.depth, None, fallback)
                .map_err(Halt::into_search_error);
        };

        let deadline = Instant::now() + budget;
        let mut report = self
            .run(grid, acting, 1, None, fallback)
            .map_err(Halt::into_search_error)?;
        for depth in 2..=self.depth {
            match self.run(grid, acting, depth, Some(deadline), fallback) {
                Ok(deeper) => report = deeper,
                Err(Halt::Expired) => {
                    debug!(completed = report.depth, "time budget spent, keeping shallower result");
                    break;
                }
                Err(Halt::Move(err)) => return Err(err.into()),
            }
        }
        Ok(report)
    }

    fn run(
        &self,
        grid: &mut Grid,
        acting: Symbol,
        depth: usize,
        deadline: Option<Instant>,
        fallback: usize,
    ) -> Result<SearchReport, Halt> {
        let mut search = Search {
            evaluator: self.evaluator.as_ref(),
            maximizer: acting,
            deadline,
            nodes: 0,
        };
        let (score, column) = search.alphabeta(grid, depth, i32::MIN, i32::MAX, true)?;
        let report = SearchReport {
            // A grid that is already decided has no best move
            column: column.unwrap_or(fallback),
            score,
            depth,
            nodes: search.nodes,
        };
        debug!(
            %acting,
            column = report.column,
            score,
            depth,
            nodes = report.nodes,
            "minimax iteration finished"
        );
        Ok(report)
    }
}

/// Why a search iteration stopped early.
enum Halt {
    Expired,
    Move(MoveError),
}

impl Halt {
    fn into_search_error(self) -> SearchError {
        match self {
            Halt::Move(err) => err.into(),
            Halt::Expired => unreachable!("a search without a deadline cannot expire"),
        }
    }
}

impl From<MoveError> for Halt {
    fn from(err: MoveError) -> Self {
        Halt::Move(err)
    }
}

struct Search<'a> {
    evaluator: &'a dyn Evaluator,
    maximizer: Symbol,
    deadline: Option<Instant>,
    nodes: u64,
}

impl Search<'_> {
    fn alphabeta(
        &mut self,
        grid: &mut Grid,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<(i32, Option<usize>), Halt> {
        self.nodes += 1;
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Halt::Expired);
        }

        let minimizer = self.maximizer.other();
        if has_four_in_a_row(grid, self.maximizer) {
            return Ok((WIN_SCORE, None));
        }
        if has_four_in_a_row(grid, minimizer) {
            return Ok((-WIN_SCORE, None));
        }
        if is_stalemate(grid) {
            return Ok((0, None));
        }
        if depth == 0 {
            return Ok((bounded(self.evaluator.score(grid, self.maximizer)), None));
        }

        let mover = if maximizing { self.maximizer } else { minimizer };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_column = None;

        for column in grid.legal_columns() {
            let (score, _) = {
                let mut child = grid.speculate(column, mover)?;
                self.alphabeta(&mut child, depth - 1, alpha, beta, !maximizing)?
            };

            if maximizing {
                if score > best {
                    best = score;
                    best_column = Some(column);
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_column = Some(column);
                }
                beta = beta.min(best);
            }

            if alpha >= beta {
                break;
            }
        }

        Ok((best, best_column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{random_move, RunWeights};
    use crate::game::COLS;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Minimax without pruning, same terminal rules and tie-breaking.
    fn plain_minimax(
        grid: &mut Grid,
        maximizer: Symbol,
        depth: usize,
        maximizing: bool,
    ) -> (i32, Option<usize>) {
        if has_four_in_a_row(grid, maximizer) {
            return (WIN_SCORE, None);
        }
        if has_four_in_a_row(grid, maximizer.other()) {
            return (-WIN_SCORE, None);
        }
        if is_stalemate(grid) {
            return (0, None);
        }
        if depth == 0 {
            return (bounded(RunCountEvaluator::default().score(grid, maximizer)), None);
        }
        let mover = if maximizing { maximizer } else { maximizer.other() };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_column = None;
        for column in grid.legal_columns() {
            let row = grid.play(column, mover).unwrap();
            let (score, _) = plain_minimax(grid, maximizer, depth - 1, !maximizing);
            grid.clear(row, column);
            let better = if maximizing { score > best } else { score < best };
            if better {
                best = score;
                best_column = Some(column);
            }
        }
        (best, best_column)
    }

    /// True if `attacker` can force four in a row within `plies` moves,
    /// with `mover` to play.
    fn forces_win(grid: &mut Grid, mover: Symbol, attacker: Symbol, plies: usize) -> bool {
        if has_four_in_a_row(grid, attacker) {
            return true;
        }
        if has_four_in_a_row(grid, attacker.other()) || is_stalemate(grid) || plies == 0 {
            return false;
        }
        let mut outcomes = grid.legal_columns().into_iter().map(|column| {
            let row = grid.play(column, mover).unwrap();
            let result = forces_win(grid, mover.other(), attacker, plies - 1);
            grid.clear(row, column);
            result
        });
        if mover == attacker {
            outcomes.any(|won| won)
        } else {
            outcomes.all(|won| won)
        }
    }

    fn forced_win_columns(grid: &mut Grid, attacker: Symbol, plies: usize) -> Vec<usize> {
        grid.legal_columns()
            .into_iter()
            .filter(|&column| {
                let row = grid.play(column, attacker).unwrap();
                let won = forces_win(grid, attacker.other(), attacker, plies - 1);
                grid.clear(row, column);
                won
            })
            .collect()
    }

    #[test]
    fn completes_open_three_at_any_depth() {
        let mut grid = Grid::new();
        for col in 0..3 {
            grid.play(col, Symbol::X).unwrap();
        }
        for depth in 1..=4 {
            let report = Minimax::new(depth).search(&mut grid, Symbol::X).unwrap();
            assert_eq!(report.column, 3, "depth {depth}");
            assert_eq!(report.score, WIN_SCORE);
        }
    }

    #[test]
    fn blocks_opponent_win() {
        let grid = Grid::from_rows(&[
            "- - - - - - -",
            "- - - - - - -",
            "- - - - - - -",
            "- - - - - - -",
            "X X - - - - -",
            "O O O - - - X",
        ]);
        for depth in 2..=4 {
            let mut scratch = grid.clone();
            let report = Minimax::new(depth).search(&mut scratch, Symbol::X).unwrap();
            assert_eq!(report.column, 3, "depth {depth}");
            assert_eq!(scratch, grid);
        }
    }

    #[test]
    fn finds_forced_win_on_small_board() {
        // X to move: column 3 threatens both (0,3) and (1,0)
        let grid = Grid::from_rows(&["- - - -", "- X X -", "O O O X", "O O X X"]);
        let mut scratch = grid.clone();
        assert_eq!(forced_win_columns(&mut scratch, Symbol::X, 3), vec![3]);

        for depth in [3, 4] {
            let report = Minimax::new(depth).search(&mut scratch, Symbol::X).unwrap();
            assert_eq!(report.column, 3, "depth {depth}");
            assert_eq!(report.score, WIN_SCORE);
        }
        assert_eq!(scratch, grid);
    }

    #[test]
    fn pruning_matches_plain_minimax() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut positions = 0;
        while positions < 24 {
            let mut grid = Grid::new();
            let mut to_move = Symbol::X;
            for _ in 0..rng.random_range(0..16) {
                let column = random_move(&grid, &mut rng).unwrap();
                grid.play(column, to_move).unwrap();
                to_move = to_move.other();
            }
            if has_four_in_a_row(&grid, Symbol::X) || has_four_in_a_row(&grid, Symbol::O) {
                continue;
            }
            positions += 1;

            for depth in 1..=4 {
                let report = Minimax::new(depth).search(&mut grid, to_move).unwrap();
                let (score, column) = plain_minimax(&mut grid, to_move, depth, true);
                assert_eq!(report.score, score, "depth {depth}\n{grid}");
                assert_eq!(Some(report.column), column, "depth {depth}\n{grid}");
            }
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let mut grid = Grid::new();
        let report = Minimax::new(4).search(&mut grid, Symbol::X).unwrap();
        let full_tree: u64 = (0..=4).map(|d| (COLS as u64).pow(d)).sum();
        assert!(report.nodes < full_tree, "{} >= {full_tree}", report.nodes);
    }

    #[test]
    fn reference_depth_leaves_grid_untouched() {
        let grid = Grid::from_rows(&[
            "- - - - - - -",
            "- - - - - - -",
            "- - - - - - -",
            "- - - O - - -",
            "- - X X O - -",
            "- O X X O - -",
        ]);
        let mut scratch = grid.clone();
        let report = Minimax::new(DEFAULT_DEPTH)
            .search(&mut scratch, Symbol::X)
            .unwrap();
        assert!(grid.legal_columns().contains(&report.column));
        assert_eq!(report.depth, DEFAULT_DEPTH);
        assert_eq!(scratch, grid);
    }

    #[test]
    fn depth_limit_uses_evaluator() {
        struct PreferColumn(usize);

        impl Evaluator for PreferColumn {
            fn score(&self, grid: &Grid, perspective: Symbol) -> i32 {
                let bottom = grid.height() - 1;
                i32::from(grid.get(bottom, self.0) == perspective.to_cell())
            }
        }

        let mut grid = Grid::new();
        let report = Minimax::with_evaluator(1, Box::new(PreferColumn(5)))
            .search(&mut grid, Symbol::O)
            .unwrap();
        assert_eq!(report.column, 5);
        assert_eq!(report.score, 1);
    }

    #[test]
    fn equal_scores_keep_first_column() {
        struct Flat;

        impl Evaluator for Flat {
            fn score(&self, _grid: &Grid, _perspective: Symbol) -> i32 {
                0
            }
        }

        let mut grid = Grid::new();
        for symbol in [Symbol::O, Symbol::X].repeat(3) {
            grid.play(0, symbol).unwrap();
        }
        let report = Minimax::with_evaluator(2, Box::new(Flat))
            .search(&mut grid, Symbol::O)
            .unwrap();
        assert_eq!(report.column, 1);
    }

    #[test]
    fn time_budget_returns_legal_move() {
        let grid = Grid::new();
        let mut scratch = grid.clone();
        let minimax = Minimax::new(10).with_time_budget(Duration::from_millis(20));
        let report = minimax.search(&mut scratch, Symbol::X).unwrap();
        assert!(report.column < COLS);
        assert!((1..=10).contains(&report.depth));
        assert_eq!(scratch, grid);

        // The answer comes from the deepest iteration that finished
        let fixed = Minimax::new(report.depth).search(&mut scratch, Symbol::X).unwrap();
        assert_eq!(report.column, fixed.column);
        assert_eq!(report.score, fixed.score);
    }

    #[test]
    fn generous_budget_reaches_full_depth() {
        let mut grid = Grid::new();
        for col in 0..3 {
            grid.play(col, Symbol::X).unwrap();
        }
        let minimax = Minimax::new(2).with_time_budget(Duration::from_secs(60));
        let report = minimax.search(&mut grid, Symbol::X).unwrap();
        assert_eq!(report.depth, 2);
        assert_eq!(report.column, 3);
    }

    #[test]
    fn heavy_partial_weights_never_outrank_a_win() {
        let grid = Grid::from_rows(&[
            "- - - - - - -",
            "- - - - - - -",
            "- - - - - - -",
            "- - - - - - -",
            "- - - - - - O",
            "X X X - X X O",
        ]);
        let weights = RunWeights {
            win: 1000,
            three: 5000,
            two: 5,
        };
        let mut scratch = grid.clone();
        let report = Minimax::with_evaluator(2, Box::new(RunCountEvaluator::new(weights)))
            .search(&mut scratch, Symbol::X)
            .unwrap();
        assert_eq!(report.column, 3);
        assert_eq!(report.score, WIN_SCORE);
        assert_eq!(scratch, grid);
    }

    #[test]
    fn decided_root_falls_back_to_first_legal_column() {
        let grid = Grid::from_rows(&[
            "- - - - - - -",
            "- - - - - - -",
            "- - - - - - O",
            "- - - - - - O",
            "X - - - - - O",
            "X X X - - - O",
        ]);
        let mut scratch = grid.clone();
        let report = Minimax::new(3).search(&mut scratch, Symbol::X).unwrap();
        assert_eq!(report.column, 0);
        assert_eq!(report.score, -WIN_SCORE);
        assert_eq!(scratch, grid);
    }

    #[test]
    fn full_grid_has_no_move() {
        let mut grid = Grid::from_rows(&["X O X O", "X O X O", "O X O X", "O X O X"]);
        assert_eq!(
            Minimax::new(3).search(&mut grid, Symbol::X),
            Err(SearchError::NoLegalMove)
        );
    }
}
