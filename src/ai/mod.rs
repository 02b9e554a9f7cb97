mod engine;
pub mod evaluator;
mod heuristic;
mod minimax;
mod random;

pub use engine::{Difficulty, SearchConfig, SearchEngine};
pub use evaluator::{bounded, score, Evaluator, RunCountEvaluator, RunWeights, WIN_SCORE};
pub use heuristic::tactical_move;
pub use minimax::{Minimax, SearchReport, DEFAULT_DEPTH};
pub use random::random_move;
