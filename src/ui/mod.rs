//! Terminal UI: play a session of Connect Four against people or the
//! computer.

mod app;
mod game_view;

pub use app::App;
