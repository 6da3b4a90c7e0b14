use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::PlayersState;
use crate::tui::widgets::{cards, spinner::Spinner};

pub fn draw(frame: &mut Frame, area: Rect, state: &PlayersState, scroll: usize, spinner: &Spinner) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Length(1), // Count
            Constraint::Min(3),    // List
        ])
        .split(area);

    let border_color = if state.search_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let cursor = if state.search_focused { "▌" } else { "" };
    let search_bar = Paragraph::new(Line::from(vec![
        Span::styled(&state.search_query, Style::default().fg(Color::White)),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Search players or teams (/) "),
    );
    frame.render_widget(search_bar, chunks[0]);

    if super::draw_placeholder(frame, chunks[2], &state.rows, "players", "No players found.", spinner) {
        return;
    }

    let visible = state.visible();
    let count = Paragraph::new(format!(
        "Showing {}/{} players",
        visible.len(),
        state.rows.rows().len()
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(count, chunks[1]);

    if visible.is_empty() {
        let empty = Paragraph::new("No players found matching your search.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(empty, chunks[2]);
        return;
    }

    let lines: Vec<Line> = visible
        .into_iter()
        .skip(scroll)
        .map(cards::player_line)
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[2]);
}
