//! One-ply tactical player: win if possible, otherwise block, otherwise
//! avoid handing the opponent a win.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::{MoveError, SearchError};
use crate::game::{has_four_in_a_row, Grid, Symbol};

/// Choose a move for `acting` by these rules, in order:
///
/// 1. the first column that wins on the spot;
/// 2. the first column where the opponent would win (block it);
/// 3. a random column that leaves the opponent no winning reply, or any
///    random legal column if every move does.
pub fn tactical_move<R: Rng + ?Sized>(
    grid: &mut Grid,
    acting: Symbol,
    rng: &mut R,
) -> Result<usize, SearchError> {
    let legal = grid.legal_columns();
    if legal.is_empty() {
        return Err(SearchError::NoLegalMove);
    }
    let opponent = acting.other();

    if let Some(column) = first_winning_column(grid, &legal, acting)? {
        return Ok(column);
    }
    if let Some(column) = first_winning_column(grid, &legal, opponent)? {
        return Ok(column);
    }

    let mut safe = Vec::with_capacity(legal.len());
    for &column in &legal {
        if !allows_winning_reply(grid, column, acting)? {
            safe.push(column);
        }
    }

    let pool = if safe.is_empty() { &legal } else { &safe };
    pool.choose(rng).copied().ok_or(SearchError::NoLegalMove)
}

fn wins_with(grid: &mut Grid, column: usize, symbol: Symbol) -> Result<bool, MoveError> {
    let speculation = grid.speculate(column, symbol)?;
    Ok(has_four_in_a_row(&speculation, symbol))
}

fn first_winning_column(
    grid: &mut Grid,
    legal: &[usize],
    symbol: Symbol,
) -> Result<Option<usize>, MoveError> {
    for &column in legal {
        if wins_with(grid, column, symbol)? {
            return Ok(Some(column));
        }
    }
    Ok(None)
}

/// True if, after `acting` plays `column`, the opponent can win at once.
fn allows_winning_reply(grid: &mut Grid, column: usize, acting: Symbol) -> Result<bool, MoveError> {
    let mut speculation = grid.speculate(column, acting)?;
    let opponent = acting.other();
    for reply in speculation.legal_columns() {
        if wins_with(&mut speculation, reply, opponent)? {
            return Ok(true);
        }
    }
    Ok(false)
}
