use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Nothing happened within one tick; also used for ignored events
    Tick,
}

/// Polls the terminal with a fixed timeout so spinners keep moving and
/// async responses get drained between keystrokes.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> std::io::Result<AppEvent> {
        if !event::poll(self.tick_rate)? {
            return Ok(AppEvent::Tick);
        }
        Ok(match event::read()? {
            // Some terminals report releases too; act on presses only
            Event::Key(key) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
            _ => AppEvent::Tick,
        })
    }
}
