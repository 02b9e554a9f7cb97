use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::SearchError;
use crate::game::Grid;

/// Pick uniformly among the legal columns.
pub fn random_move<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Result<usize, SearchError> {
    grid.legal_columns()
        .choose(rng)
        .copied()
        .ok_or(SearchError::NoLegalMove)
}
