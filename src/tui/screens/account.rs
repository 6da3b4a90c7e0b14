use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::core::forms::Field;
use crate::core::session::Session;
use crate::tui::app::{AccountMode, AccountState};
use crate::tui::widgets::spinner::Spinner;

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    state: &AccountState,
    session: Option<&Session>,
    spinner: &Spinner,
) {
    match session {
        Some(session) => draw_signed_in(frame, area, state, session),
        None => draw_form(frame, area, state, spinner),
    }
}

fn draw_signed_in(frame: &mut Frame, area: Rect, state: &AccountState, session: &Session) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(ref notice) = state.notice {
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(format!(
        "Signed in as {} ({})",
        session.username, session.role
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "l Sign out  ←/→ Pages  q Quit",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(block, centered(area, 60, 9));
}

fn draw_form(frame: &mut Frame, area: Rect, state: &AccountState, spinner: &Spinner) {
    let fields = state.fields();

    let mut constraints = vec![
        Constraint::Length(2), // Title
        Constraint::Length(2), // Banner
    ];
    constraints.extend(fields.iter().map(|_| Constraint::Length(4)));
    constraints.push(Constraint::Min(2)); // Hints

    let form_area = centered(area, 60, 6 + 4 * fields.len() as u16);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(form_area);

    let (title, subtitle) = match state.mode {
        AccountMode::SignIn => ("Sign In", "Welcome back"),
        AccountMode::SignUp => ("Create Account", "Sign up to manage the league"),
    };
    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[0]);

    let banner = if state.submitting {
        let verb = match state.mode {
            AccountMode::SignIn => "Signing in...",
            AccountMode::SignUp => "Creating account...",
        };
        Line::from(format!("{} {verb}", spinner.current()))
    } else if let Some(ref error) = state.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
    } else if let Some(ref notice) = state.notice {
        Line::from(Span::styled(notice.as_str(), Style::default().fg(Color::Green)))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(banner).alignment(Alignment::Center), chunks[1]);

    for (i, field) in fields.iter().enumerate() {
        draw_field(frame, chunks[2 + i], state, *field, i == state.focus);
    }

    let hints = Paragraph::new(Line::from(Span::styled(
        "Tab Next field  Enter Submit  F2 Switch sign in/up  ←/→ Pages",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hints, chunks[2 + fields.len()]);
}

fn draw_field(frame: &mut Frame, area: Rect, state: &AccountState, field: Field, focused: bool) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let raw = state.value(field);
    let shown = match field {
        Field::Username => raw.to_string(),
        Field::Password | Field::ConfirmPassword => "•".repeat(raw.chars().count()),
    };
    let shown_len = shown.chars().count() as u16;

    let border = if state.submitting {
        Color::DarkGray
    } else if focused {
        Color::Cyan
    } else {
        Color::Gray
    };
    let input = Paragraph::new(shown).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", field.label())),
    );
    frame.render_widget(input, parts[0]);

    if focused && !state.submitting {
        let cursor_x = parts[0].x + 1 + shown_len.min(parts[0].width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, parts[0].y + 1));
    }

    if let Some(error) = state.field_errors.get(field) {
        let msg = Paragraph::new(Span::styled(error, Style::default().fg(Color::Red)));
        frame.render_widget(msg, parts[1]);
    }
}

/// A `width` x `height` box centred in `area`, clamped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
