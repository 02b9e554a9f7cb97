//! Computer-vs-computer matches with rolling statistics.

mod metrics;
mod runner;

pub use metrics::{MatchMetrics, RoundRecord};
pub use runner::{play_round, Arena};
