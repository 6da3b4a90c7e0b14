use ratatui::{Frame, layout::Rect, text::Line, widgets::Paragraph};

use crate::core::models::Match;
use crate::core::page::PageState;
use crate::tui::widgets::{cards, spinner::Spinner};

pub fn draw(frame: &mut Frame, area: Rect, state: &PageState<Match>, scroll: usize, spinner: &Spinner) {
    if super::draw_placeholder(frame, area, state, "matches", "No matches scheduled.", spinner) {
        return;
    }

    let lines: Vec<Line> = state
        .rows()
        .iter()
        .skip(scroll)
        .flat_map(cards::match_card)
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}
