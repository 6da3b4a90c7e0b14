use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::core::models::{Match, Player, Team};

pub fn completed_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn pending_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Yellow)
}

/// Badge colour for a match status; "Completed" gets its own look
pub fn status_style(m: &Match) -> Style {
    if m.is_completed() {
        completed_style()
    } else {
        pending_style()
    }
}

pub fn match_card(m: &Match) -> Vec<Line<'static>> {
    let muted = Style::default().fg(Color::DarkGray);
    let team = Style::default().add_modifier(Modifier::BOLD);

    vec![
        Line::from(vec![
            Span::styled(format!("📅 {}", m.display_date()), muted),
            Span::raw("   "),
            Span::styled(format!("📍 {}", m.venue), muted),
        ]),
        Line::from(vec![
            Span::styled(m.team1_name.clone(), team),
            Span::raw("  "),
            Span::styled(format!(" {} ", m.status), status_style(m)),
            Span::raw("  "),
            Span::styled(m.team2_name.clone(), team),
        ]),
        Line::from(""),
    ]
}

pub fn team_card(team: &Team) -> Vec<Line<'static>> {
    let founded = team
        .foundation_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".into());

    vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", team.initial()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(" "),
            Span::styled(
                team.team_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ID: {}", team.team_id),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(format!("    Coach: {}   Est: {founded}", team.coach_name)),
        Line::from(""),
    ]
}

pub fn player_line(player: &Player) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("#{:<3}", player.jersey_number),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{:<26}", player.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:<12}", player.position),
            Style::default().fg(Color::Blue),
        ),
        Span::styled("Playing for ", Style::default().fg(Color::DarkGray)),
        Span::raw(player.team_name.clone()),
    ])
}
