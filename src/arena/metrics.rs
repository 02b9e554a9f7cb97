use std::collections::VecDeque;

use crate::game::Symbol;

/// Result of a single arena round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRecord {
    pub winner: Option<Symbol>,
    pub first: Symbol,
    pub length: usize,
}

/// Match statistics with rolling window computations.
#[derive(Debug, Clone)]
pub struct MatchMetrics {
    rounds: VecDeque<RoundRecord>,
    capacity: usize,
    // lifetime counts, never capped
    total_rounds: usize,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl MatchMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        MatchMetrics {
            rounds: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            total_rounds: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_round(&mut self, record: RoundRecord) {
        self.total_rounds += 1;
        match record.winner {
            Some(Symbol::X) => self.x_wins += 1,
            Some(Symbol::O) => self.o_wins += 1,
            None => self.draws += 1,
        }
        self.rounds.push_back(record);
        if self.rounds.len() > self.capacity {
            self.rounds.pop_front();
        }
    }

    fn recent(&self, last_n: usize) -> impl Iterator<Item = &RoundRecord> {
        self.rounds.iter().rev().take(last_n)
    }

    fn rate(&self, last_n: usize, hit: impl Fn(&RoundRecord) -> bool) -> f32 {
        let n = self.rounds.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self.recent(n).filter(|r| hit(r)).count();
        hits as f32 / n as f32
    }

    /// Win rate for `symbol` in the last N rounds.
    pub fn win_rate(&self, symbol: Symbol, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner == Some(symbol))
    }

    /// Draw rate in the last N rounds.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner.is_none())
    }

    /// Average number of moves over the last N rounds.
    pub fn average_round_length(&self, last_n: usize) -> f32 {
        let n = self.rounds.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.recent(n).map(|r| r.length).sum();
        total as f32 / n as f32
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    pub fn wins(&self, symbol: Symbol) -> usize {
        match symbol {
            Symbol::X => self.x_wins,
            Symbol::O => self.o_wins,
        }
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl Default for MatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
