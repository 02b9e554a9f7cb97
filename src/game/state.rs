use tracing::info;

use super::board::Grid;
use super::player::{Player, Symbol};
use super::win::{has_four_in_a_row, is_stalemate, winner};
use crate::ai::SearchEngine;
use crate::error::{MoveError, SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Winner(Symbol),
    Draw,
}

/// A single round: one grid played until a win or a stalemate.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    grid: Grid,
    to_move: Symbol,
    outcome: Option<RoundOutcome>,
    moves: usize,
}

impl Round {
    /// Start a round on `grid` with `first` to move.
    pub fn new(grid: Grid, first: Symbol) -> Self {
        debug_assert!(grid.is_settled(), "pieces must rest on the bottom or another piece");
        let outcome = match winner(&grid) {
            Some(symbol) => Some(RoundOutcome::Winner(symbol)),
            None if is_stalemate(&grid) => Some(RoundOutcome::Draw),
            None => None,
        };
        Round {
            grid,
            to_move: first,
            outcome,
            moves: 0,
        }
    }

    /// Start a round on an empty 7×6 grid.
    pub fn standard(first: Symbol) -> Self {
        Self::new(Grid::new(), first)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Symbol to play next
    pub fn to_move(&self) -> Symbol {
        self.to_move
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Moves applied since the round started.
    pub fn move_count(&self) -> usize {
        self.moves
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.grid.legal_columns()
    }

    /// Drop the next piece into `column` and settle the round if it ends.
    pub fn apply_move(&mut self, column: usize) -> Result<Option<RoundOutcome>, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::RoundOver);
        }

        let symbol = self.to_move;
        self.grid.play(column, symbol)?;
        self.moves += 1;

        // Win before stalemate: the winning move can fill the grid.
        if has_four_in_a_row(&self.grid, symbol) {
            self.outcome = Some(RoundOutcome::Winner(symbol));
        } else if is_stalemate(&self.grid) {
            self.outcome = Some(RoundOutcome::Draw);
        }

        self.to_move = symbol.other();
        Ok(self.outcome)
    }
}

/// Two players and their current round. Players and win streaks survive
/// replays; the round is replaced.
#[derive(Debug, Clone)]
pub struct Session {
    players: [Player; 2],
    round: Round,
    rounds_played: u32,
}

impl Session {
    /// Start a session; `player_one` opens the first round.
    ///
    /// # Panics
    ///
    /// Panics if both players carry the same symbol.
    pub fn new(player_one: Player, player_two: Player) -> Self {
        assert_ne!(
            player_one.symbol(),
            player_two.symbol(),
            "players must use different symbols"
        );
        let first = player_one.symbol();
        Session {
            players: [player_one, player_two],
            round: Round::standard(first),
            rounds_played: 0,
        }
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// The player using `symbol`.
    pub fn player(&self, symbol: Symbol) -> &Player {
        if self.players[0].symbol() == symbol {
            &self.players[0]
        } else {
            &self.players[1]
        }
    }

    fn player_mut(&mut self, symbol: Symbol) -> &mut Player {
        if self.players[0].symbol() == symbol {
            &mut self.players[0]
        } else {
            &mut self.players[1]
        }
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.round.to_move())
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Rounds that reached a win or a stalemate.
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Apply a move for the player to move, crediting the winner's streak
    /// when the round ends.
    pub fn apply_move(&mut self, column: usize) -> Result<Option<RoundOutcome>, MoveError> {
        let outcome = self.round.apply_move(column)?;
        match outcome {
            Some(RoundOutcome::Winner(symbol)) => {
                self.rounds_played += 1;
                let player = self.player_mut(symbol);
                player.record_win();
                info!(
                    winner = player.name(),
                    %symbol,
                    streak = player.win_streak(),
                    "round won"
                );
            }
            Some(RoundOutcome::Draw) => {
                self.rounds_played += 1;
                info!(moves = self.round.move_count(), "round ended in stalemate");
            }
            None => {}
        }
        Ok(outcome)
    }

    /// Ask `engine` for the current player's move. `None` when a human is to
    /// move.
    pub fn computer_move(
        &mut self,
        engine: &mut SearchEngine,
    ) -> Result<Option<usize>, SearchError> {
        if self.round.is_terminal() {
            return Err(SearchError::NoLegalMove);
        }
        let player = self.current_player();
        let symbol = player.symbol();
        match player.difficulty() {
            None => Ok(None),
            Some(difficulty) => engine
                .choose_move(self.round.grid_mut(), symbol, difficulty)
                .map(Some),
        }
    }

    /// Replace the round with a fresh grid. Turn order keeps alternating.
    pub fn start_new_round(&mut self) {
        self.round = Round::standard(self.round.to_move());
    }
}
