use crate::ai::SearchEngine;
use crate::error::MoveError;
use crate::game::{RoundOutcome, Session};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing::warn;

pub struct App {
    session: Session,
    engine: SearchEngine,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    computer_delay: Duration,
    // When the computer to move started "thinking"
    thinking_since: Option<Instant>,
}

impl App {
    pub fn new(session: Session, engine: SearchEngine, computer_delay: Duration) -> Self {
        let selected_column = session.round().grid().width() / 2;
        App {
            session,
            engine,
            selected_column,
            should_quit: false,
            message: None,
            computer_delay,
            thinking_since: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.tick(Instant::now());
            self.handle_events()?;
        }
        Ok(())
    }

    /// Let a computer player move once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        let round = self.session.round();
        if round.is_terminal() || self.session.current_player().is_human() {
            self.thinking_since = None;
            return;
        }

        match self.thinking_since {
            None => {
                self.thinking_since = Some(now);
                let name = self.session.current_player().name();
                self.message = Some(format!("{name} is thinking…"));
            }
            Some(since) if now.duration_since(since) >= self.computer_delay => {
                self.thinking_since = None;
                self.computer_move();
            }
            Some(_) => {}
        }
    }

    fn computer_move(&mut self) {
        match self.session.computer_move(&mut self.engine) {
            Ok(Some(column)) => {
                self.selected_column = column;
                self.drop_piece();
            }
            Ok(None) => {}
            Err(err) => {
                warn!(%err, "computer could not move");
                self.message = Some(format!(
                    "Computer could not move: {err}. Press 'r' for a new round."
                ));
            }
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                let last = self.session.round().grid().width() - 1;
                if self.selected_column < last {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.session.current_player().is_human() || self.session.round().is_terminal() {
                    self.drop_piece();
                }
            }
            KeyCode::Char('r') => {
                self.session.start_new_round();
                self.thinking_since = None;
                self.selected_column = self.session.round().grid().width() / 2;
                self.message = Some(format!(
                    "New round! {} starts.",
                    self.session.current_player().name()
                ));
            }
            _ => {}
        }
    }

    /// Drop the current player's piece in the selected column
    fn drop_piece(&mut self) {
        let mover = self.session.current_player().name().to_string();
        self.message = match self.session.apply_move(self.selected_column) {
            Ok(None) => None,
            Ok(Some(RoundOutcome::Winner(symbol))) => {
                let winner = self.session.player(symbol);
                Some(format!(
                    "{} wins! Streak: {}. Press 'r' for a new round.",
                    winner.name(),
                    winner.win_streak()
                ))
            }
            Ok(Some(RoundOutcome::Draw)) => {
                Some("Stalemate! Press 'r' for a new round.".to_string())
            }
            Err(MoveError::ColumnFull { column }) => {
                Some(format!("Column {column} is full, {mover}. Pick another."))
            }
            Err(MoveError::InvalidColumn { column }) => {
                Some(format!("Column {column} does not exist."))
            }
            Err(MoveError::RoundOver) => {
                Some("The round is over. Press 'r' for a new round.".to_string())
            }
        };
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.session, self.selected_column, self.message());
    }
}
