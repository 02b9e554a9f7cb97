use tracing::info;

use super::metrics::{MatchMetrics, RoundRecord};
use crate::ai::{Difficulty, SearchEngine};
use crate::config::ArenaConfig;
use crate::error::SearchError;
use crate::game::{Round, RoundOutcome, Symbol};

/// Play one computer-vs-computer round on a fresh grid.
pub fn play_round(
    engine: &mut SearchEngine,
    x: Difficulty,
    o: Difficulty,
    first: Symbol,
) -> Result<RoundRecord, SearchError> {
    let mut round = Round::standard(first);

    while !round.is_terminal() {
        let acting = round.to_move();
        let difficulty = match acting {
            Symbol::X => x,
            Symbol::O => o,
        };
        let column = engine.choose_move(round.grid_mut(), acting, difficulty)?;
        round.apply_move(column)?;
    }

    let winner = match round.outcome() {
        Some(RoundOutcome::Winner(symbol)) => Some(symbol),
        Some(RoundOutcome::Draw) | None => None,
    };
    Ok(RoundRecord {
        winner,
        first,
        length: round.move_count(),
    })
}

/// Runs a series of rounds between two difficulties.
pub struct Arena {
    engine: SearchEngine,
    x: Difficulty,
    o: Difficulty,
    config: ArenaConfig,
}

impl Arena {
    pub fn new(engine: SearchEngine, x: Difficulty, o: Difficulty, config: ArenaConfig) -> Self {
        Arena { engine, x, o, config }
    }

    /// Play `rounds` rounds, X opening the first and the opener alternating
    /// after that.
    pub fn run(&mut self, rounds: usize) -> Result<MatchMetrics, SearchError> {
        let mut metrics = MatchMetrics::with_capacity(self.config.window);
        let window = self.config.window;
        info!(x = %self.x, o = %self.o, rounds, "arena started");

        for index in 0..rounds {
            let first = if index % 2 == 0 { Symbol::X } else { Symbol::O };
            let record = play_round(&mut self.engine, self.x, self.o, first)?;
            metrics.record_round(record);

            let played = index + 1;
            if played % self.config.log_interval.max(1) == 0 {
                info!(
                    rounds = played,
                    x_win_rate = %format!("{:.1}%", metrics.win_rate(Symbol::X, window) * 100.0),
                    o_win_rate = %format!("{:.1}%", metrics.win_rate(Symbol::O, window) * 100.0),
                    draw_rate = %format!("{:.1}%", metrics.draw_rate(window) * 100.0),
                    avg_length = %format!("{:.1}", metrics.average_round_length(window)),
                    "arena progress"
                );
            }
        }

        info!(
            rounds = metrics.total_rounds(),
            x_wins = metrics.wins(Symbol::X),
            o_wins = metrics.wins(Symbol::O),
            draws = metrics.draws(),
            "arena finished"
        );
        Ok(metrics)
    }
}
