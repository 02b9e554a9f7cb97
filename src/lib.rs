//! # Connect Four
//!
//! A Connect Four game for the terminal with three computer strengths:
//! random, a one-ply tactical player, and depth-limited alpha-beta minimax.
//!
//! ## Modules
//!
//! - [`game`] - Grid, line scanning, win detection, rounds and sessions
//! - [`ai`] - Evaluator, the three move-choosing tiers and the search engine
//! - [`arena`] - Computer-vs-computer matches and their statistics
//! - [`ui`] - Terminal UI for playing a session
//! - [`config`] - TOML configuration loading and validation
//! - [`error`] - Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
