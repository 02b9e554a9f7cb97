use crate::game::{Cell, Grid, Player, Session, Symbol};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, session: &Session, selected_column: usize, message: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(12),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_board(frame, session.round().grid(), selected_column, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn symbol_color(symbol: Symbol) -> Color {
    match symbol {
        Symbol::X => Color::Red,
        Symbol::O => Color::Yellow,
    }
}

fn player_span(player: &Player) -> Span<'static> {
    Span::styled(
        format!("{} ({})  streak {}", player.name(), player.symbol(), player.win_streak()),
        Style::default()
            .fg(symbol_color(player.symbol()))
            .add_modifier(Modifier::BOLD),
    )
}

fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let [one, two] = session.players();
    let players = Line::from(vec![player_span(one), Span::raw("   vs   "), player_span(two)]);

    let round = session.round();
    let status = if round.is_terminal() {
        Line::from(format!("Round over  |  rounds played: {}", session.rounds_played()))
    } else {
        let current = session.current_player();
        Line::from(vec![
            Span::raw("To move: "),
            Span::styled(
                current.name().to_string(),
                Style::default().fg(symbol_color(current.symbol())),
            ),
        ])
    };

    let header = Paragraph::new(vec![players, status])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, grid: &Grid, selected_column: usize, area: Rect) {
    let width = grid.width();
    let mut lines = Vec::new();

    // Selector above the chosen column
    let mut selector = vec![Span::raw("   ")];
    for col in 0..width {
        if col == selected_column {
            selector.push(Span::styled(
                " ▼ ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        } else {
            selector.push(Span::raw("   "));
        }
    }
    selector.push(Span::raw("  "));
    lines.push(Line::from(selector));

    let rule = "═".repeat(width * 3 + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for row in 0..grid.height() {
        let mut row_spans = vec![Span::raw("  ║")];
        for col in 0..width {
            let (disc, color) = match grid.get(row, col) {
                Cell::Empty => (" . ", Color::DarkGray),
                Cell::X => (" ● ", symbol_color(Symbol::X)),
                Cell::O => (" ● ", symbol_color(Symbol::O)),
            };
            row_spans.push(Span::styled(disc, Style::default().fg(color)));
        }
        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    // Column indices
    let mut indices = vec![Span::raw("   ")];
    for col in 0..width {
        let style = if col == selected_column {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        indices.push(Span::styled(format!(" {col} "), style));
    }
    indices.push(Span::raw("  "));
    lines.push(Line::from(indices));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let keys = "←/→: Move  |  Enter/Space: Drop  |  R: New round  |  Q/Esc: Quit";
    let controls = Paragraph::new(keys)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
