use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use super::app::{App, Page};
use super::screens;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let titles: Vec<Line> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, page)| Line::from(format!("{} {}", i + 1, page.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.page.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let main_block = Block::default()
        .title(format!(" {} ", app.page.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = main_block.inner(chunks[1]);
    frame.render_widget(main_block, chunks[1]);

    match app.page {
        Page::Leaderboard => {
            screens::leaderboard::draw(frame, inner, &app.leaderboard, app.scroll, &app.spinner)
        }
        Page::Matches => {
            screens::matches::draw(frame, inner, &app.matches, app.scroll, &app.spinner)
        }
        Page::Teams => screens::teams::draw(frame, inner, &app.teams, app.scroll, &app.spinner),
        Page::Players => {
            screens::players::draw(frame, inner, &app.players, app.scroll, &app.spinner)
        }
        Page::Tournaments => {
            screens::tournaments::draw(frame, inner, &app.tournaments, app.scroll, &app.spinner)
        }
        Page::Account => {
            let session = app.session.current();
            screens::account::draw(frame, inner, &app.account, session.as_ref(), &app.spinner)
        }
    }

    frame.render_widget(status_bar(app), chunks[2]);
}

fn status_bar(app: &App) -> Paragraph<'static> {
    let who = match app.session.current() {
        Some(session) => Span::styled(
            format!(" {} ({}) ", session.username, session.role),
            Style::default().fg(Color::Black).bg(Color::Green),
        ),
        None => Span::styled(" Guest ", Style::default().fg(Color::Black).bg(Color::Gray)),
    };
    let hints = match app.page {
        Page::Account => "  ←/→ Pages  Ctrl+C Quit",
        Page::Players => "  ←/→ Pages  / Search  j/k Scroll  q Quit",
        _ => "  ←/→ Pages  j/k Scroll  q Quit",
    };
    Paragraph::new(Line::from(vec![
        who,
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]))
}
