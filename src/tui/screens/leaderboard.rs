use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Cell, Row, Table},
};

use crate::core::models::LeaderboardEntry;
use crate::core::page::PageState;
use crate::tui::widgets::spinner::Spinner;

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    state: &PageState<LeaderboardEntry>,
    scroll: usize,
    spinner: &Spinner,
) {
    if super::draw_placeholder(frame, area, state, "leaderboard", "No standings yet.", spinner) {
        return;
    }

    let header = Row::new(["Pos", "Team", "MP", "W", "D", "L", "GF", "Pts"]).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    // Rows arrive in rank order; position is the index
    let rows = state
        .rows()
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(index, entry)| {
            let name = if index == 0 {
                format!("{} 🏆", entry.team_name)
            } else {
                entry.team_name.clone()
            };
            Row::new(vec![
                Cell::from((index + 1).to_string()),
                Cell::from(name).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(entry.matches_played.to_string()),
                Cell::from(entry.wins.to_string()).style(Style::default().fg(Color::Green)),
                Cell::from(entry.draws.to_string()),
                Cell::from(entry.losses.to_string()).style(Style::default().fg(Color::Red)),
                Cell::from(entry.goals_for.to_string()),
                Cell::from(entry.total_points.to_string())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            ])
        });

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
    ];

    frame.render_widget(Table::new(rows, widths).header(header), area);
}
