//! Win and stalemate detection over the grid's lines.

use super::board::{Grid, WIN_LENGTH};
use super::player::Symbol;

/// True if four consecutive cells of some row, column or diagonal hold
/// `symbol`.
pub fn has_four_in_a_row(grid: &Grid, symbol: Symbol) -> bool {
    grid.lines().any(|line| line.contains_run(symbol, WIN_LENGTH))
}

/// True if no column can take another piece. Check for a win first: the
/// winning move may also fill the grid.
pub fn is_stalemate(grid: &Grid) -> bool {
    grid.legal_columns().is_empty()
}

/// The symbol holding four in a row, if any.
pub fn winner(grid: &Grid) -> Option<Symbol> {
    [Symbol::X, Symbol::O]
        .into_iter()
        .find(|&symbol| has_four_in_a_row(grid, symbol))
}
