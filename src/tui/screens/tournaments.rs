use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Row, Table},
};

use crate::core::models::Tournament;
use crate::core::page::PageState;
use crate::tui::widgets::spinner::Spinner;

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    state: &PageState<Tournament>,
    scroll: usize,
    spinner: &Spinner,
) {
    if super::draw_placeholder(frame, area, state, "tournaments", "No tournaments found.", spinner) {
        return;
    }

    let header = Row::new(["ID", "Name", "Type", "Host", "Teams", "Matches", "Start", "End"])
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let rows = state.rows().iter().skip(scroll).map(|t| {
        Row::new(vec![
            t.tournament_id.to_string(),
            t.name.clone(),
            t.kind.clone(),
            t.host_country.clone(),
            t.no_of_teams.to_string(),
            t.no_of_matches.to_string(),
            t.start_date.clone(),
            t.end_date.clone(),
        ])
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    frame.render_widget(Table::new(rows, widths).header(header), area);
}
