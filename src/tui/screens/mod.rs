pub mod account;
pub mod leaderboard;
pub mod matches;
pub mod players;
pub mod teams;
pub mod tournaments;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
};

use crate::core::page::PageState;
use crate::tui::widgets::spinner::Spinner;

/// Draws the loading line or the empty message for `state`.
/// Returns false when there are rows for the caller to draw.
pub fn draw_placeholder<T>(
    frame: &mut Frame,
    area: Rect,
    state: &PageState<T>,
    what: &str,
    empty_text: &str,
    spinner: &Spinner,
) -> bool {
    let (text, style) = if state.is_loading() {
        (
            spinner.label(what),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else if state.rows().is_empty() {
        // A failed fetch looks like an empty list; the error is in the log
        (empty_text.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        return false;
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
    true
}
