use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::error;

use crate::config::Settings;
use crate::core::client::LeagueClient;
use crate::core::session::SessionStore;
use crate::core::storage::FileStorage;
use crate::tui::app::{App, Page};
use crate::tui::async_bridge::{AsyncBridge, AsyncRequest, AsyncResponse};
use crate::tui::event::{AppEvent, EventHandler};
use crate::tui::ui;

pub fn run(settings: Settings) -> Result<()> {
    let session = SessionStore::open(Arc::new(FileStorage::new(&settings.state_dir)));
    let client = LeagueClient::new(&settings, session.clone())?;

    let (request_tx, request_rx) = mpsc::channel::<AsyncRequest>(32);
    let (response_tx, response_rx) = mpsc::channel::<AsyncResponse>(32);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let bridge = AsyncBridge::new(request_rx, response_tx, client);
    let bridge_thread = std::thread::spawn(move || {
        runtime.block_on(bridge.run());
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(request_tx, session);
    app.visit(Page::Leaderboard);

    let event_handler = EventHandler::new(Duration::from_millis(100));
    let mut response_rx = response_rx;

    let result = run_loop(&mut terminal, &mut app, &event_handler, &mut response_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Hanging up stops the bridge, which aborts any pending fetch
    drop(app);
    if bridge_thread.join().is_err() {
        error!("Async bridge thread panicked");
    }

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
    response_rx: &mut mpsc::Receiver<AsyncResponse>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(response) = response_rx.try_recv() {
            app.handle_async_response(response);
        }

        match event_handler.next()? {
            AppEvent::Key(key) => handle_key_event(app, key),
            AppEvent::Tick => app.tick(),
        }
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == Char('c') {
        app.quit();
        return;
    }

    // Page switching works everywhere; text inputs never need arrows
    match key.code {
        Left => return app.prev_page(),
        Right => return app.next_page(),
        _ => {}
    }

    match app.page {
        Page::Account => handle_account_keys(app, key),
        Page::Players if app.players.search_focused => handle_search_keys(app, key),
        _ => handle_list_keys(app, key),
    }
}

fn handle_list_keys(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    match key.code {
        Char('q') => app.quit(),
        Char('/') if app.page == Page::Players => app.players_focus_search(),
        Down | Char('j') => app.scroll_down(),
        Up | Char('k') => app.scroll_up(),
        Esc if app.page == Page::Players => app.players_search_clear(),
        Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            app.visit(Page::ALL[index]);
        }
        _ => {}
    }
}

fn handle_search_keys(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    match key.code {
        Char(c) => app.players_search_input(c),
        Backspace => app.players_search_backspace(),
        Esc => app.players_search_clear(),
        Enter | Tab => app.players_search_done(),
        Down => app.scroll_down(),
        Up => app.scroll_up(),
        _ => {}
    }
}

fn handle_account_keys(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    if app.session.is_logged_in() {
        match key.code {
            Char('l') => app.account_logout(),
            Char('q') => app.quit(),
            _ => {}
        }
        return;
    }

    if app.account.submitting {
        return; // Ignore input while the request is in flight
    }

    match key.code {
        F(2) => app.account_toggle_mode(),
        Tab | Down => app.account_next_field(),
        BackTab | Up => app.account_prev_field(),
        Enter => app.account_submit(),
        Backspace => app.account_delete_char(),
        Char(c) => app.account_input_char(c),
        _ => {}
    }
}
