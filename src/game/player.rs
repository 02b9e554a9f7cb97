use std::fmt;

use super::board::Cell;
use crate::ai::Difficulty;

/// One of the two player marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Get the other symbol
    pub fn other(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// Convert symbol to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Symbol::X => Cell::X,
            Symbol::O => Cell::O,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Symbol::X => "X",
            Symbol::O => "O",
        })
    }
}

/// Who decides a player's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Controller {
    Human,
    Computer(Difficulty),
}

/// A participant that lives for the whole session. Only the win streak
/// changes once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    symbol: Symbol,
    controller: Controller,
    win_streak: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, symbol: Symbol, controller: Controller) -> Self {
        Player {
            name: name.into(),
            symbol,
            controller,
            win_streak: 0,
        }
    }

    pub fn human(name: impl Into<String>, symbol: Symbol) -> Self {
        Self::new(name, symbol, Controller::Human)
    }

    pub fn computer(name: impl Into<String>, symbol: Symbol, difficulty: Difficulty) -> Self {
        Self::new(name, symbol, Controller::Computer(difficulty))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_human(&self) -> bool {
        self.controller == Controller::Human
    }

    /// Difficulty tier, only for computer players.
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.controller {
            Controller::Human => None,
            Controller::Computer(difficulty) => Some(difficulty),
        }
    }

    pub fn win_streak(&self) -> u32 {
        self.win_streak
    }

    pub(crate) fn record_win(&mut self) {
        self.win_streak += 1;
    }
}
