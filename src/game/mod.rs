//! Core Connect Four game logic: grid and line views, win detection, players
//! and the round/session state machine.

mod board;
mod player;
mod state;
pub mod win;

pub use board::{Cell, Grid, Line, LineKind, Speculation, COLS, ROWS, WIN_LENGTH};
pub use player::{Controller, Player, Symbol};
pub use state::{Round, RoundOutcome, Session};
pub use win::{has_four_in_a_row, is_stalemate};
