use tokio::sync::mpsc;
use tracing::debug;

use crate::core::forms::{Field, FieldErrors, LoginForm, SignupForm};
use crate::core::models::{LeaderboardEntry, Match, Player, Team, Tournament};
use crate::core::page::PageState;
use crate::core::search::filter_players;
use crate::core::session::{Session, SessionStore};
use crate::tui::async_bridge::{AsyncRequest, AsyncResponse, PagePayload};
use crate::tui::widgets::spinner::Spinner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Leaderboard,
    Matches,
    Teams,
    Players,
    Tournaments,
    Account,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Leaderboard,
        Page::Matches,
        Page::Teams,
        Page::Players,
        Page::Tournaments,
        Page::Account,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Leaderboard => "Leaderboard",
            Page::Matches => "Matches",
            Page::Teams => "Teams",
            Page::Players => "Players",
            Page::Tournaments => "Tournaments",
            Page::Account => "Account",
        }
    }

    pub fn index(&self) -> usize {
        Page::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Page {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    pub fn prev(&self) -> Page {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }

    /// Pages that fetch a list when they become visible
    pub fn fetches_on_mount(&self) -> bool {
        !matches!(self, Page::Account)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountMode {
    #[default]
    SignIn,
    SignUp,
}

/// Signup / sign-in form state
#[derive(Default)]
pub struct AccountState {
    pub mode: AccountMode,
    /// Index into `fields()`
    pub focus: usize,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub field_errors: FieldErrors,
    /// Server or network failure text
    pub error: Option<String>,
    pub submitting: bool,
    pub notice: Option<String>,
}

impl AccountState {
    pub fn fields(&self) -> &'static [Field] {
        match self.mode {
            AccountMode::SignIn => &[Field::Username, Field::Password],
            AccountMode::SignUp => &[Field::Username, Field::Password, Field::ConfirmPassword],
        }
    }

    pub fn focused_field(&self) -> Field {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        }
    }

    fn clear_inputs(&mut self) {
        self.username.clear();
        self.password.clear();
        self.confirm_password.clear();
        self.focus = 0;
        self.field_errors = FieldErrors::default();
        self.error = None;
    }
}

/// Players page: fetched rows plus the search box
#[derive(Default)]
pub struct PlayersState {
    pub rows: PageState<Player>,
    pub search_query: String,
    pub search_focused: bool,
}

impl PlayersState {
    pub fn visible(&self) -> Vec<&Player> {
        filter_players(self.rows.rows(), &self.search_query)
    }
}

pub struct App {
    pub page: Page,
    pub should_quit: bool,

    pub session: SessionStore,

    // Page states
    pub leaderboard: PageState<LeaderboardEntry>,
    pub matches: PageState<Match>,
    pub teams: PageState<Team>,
    pub players: PlayersState,
    pub tournaments: PageState<Tournament>,
    pub account: AccountState,

    /// First visible row of the current list
    pub scroll: usize,
    pub spinner: Spinner,

    /// Visit whose fetch results are still wanted
    pub current_visit: Option<u64>,
    next_visit: u64,

    pub async_tx: mpsc::Sender<AsyncRequest>,
}

impl App {
    pub fn new(async_tx: mpsc::Sender<AsyncRequest>, session: SessionStore) -> Self {
        Self {
            page: Page::Leaderboard,
            should_quit: false,
            session,
            leaderboard: PageState::Loading,
            matches: PageState::Loading,
            teams: PageState::Loading,
            players: PlayersState::default(),
            tournaments: PageState::Loading,
            account: AccountState::default(),
            scroll: 0,
            spinner: Spinner::default(),
            current_visit: None,
            next_visit: 0,
            async_tx,
        }
    }

    pub fn quit(&mut self) {
        self.leave_page();
        self.should_quit = true;
    }

    pub fn tick(&mut self) {
        if self.is_busy() {
            self.spinner.tick();
        }
    }

    /// True while the current page waits on the network
    pub fn is_busy(&self) -> bool {
        match self.page {
            Page::Leaderboard => self.leaderboard.is_loading(),
            Page::Matches => self.matches.is_loading(),
            Page::Teams => self.teams.is_loading(),
            Page::Players => self.players.rows.is_loading(),
            Page::Tournaments => self.tournaments.is_loading(),
            Page::Account => self.account.submitting,
        }
    }

    /// Shows `page`, tearing down the previous visit and issuing exactly
    /// one fetch for list pages.
    pub fn visit(&mut self, page: Page) {
        self.leave_page();
        self.page = page;
        self.scroll = 0;

        if !page.fetches_on_mount() {
            return;
        }

        match page {
            Page::Leaderboard => self.leaderboard = PageState::Loading,
            Page::Matches => self.matches = PageState::Loading,
            Page::Teams => self.teams = PageState::Loading,
            Page::Players => self.players.rows = PageState::Loading,
            Page::Tournaments => self.tournaments = PageState::Loading,
            Page::Account => {}
        }

        self.next_visit += 1;
        let visit = self.next_visit;
        self.current_visit = Some(visit);
        let _ = self.async_tx.try_send(AsyncRequest::Load { visit, page });
    }

    fn leave_page(&mut self) {
        if let Some(visit) = self.current_visit.take() {
            let _ = self.async_tx.try_send(AsyncRequest::Cancel { visit });
        }
    }

    pub fn next_page(&mut self) {
        self.visit(self.page.next());
    }

    pub fn prev_page(&mut self) {
        self.visit(self.page.prev());
    }

    /// Number of rows the current page shows
    pub fn visible_count(&self) -> usize {
        match self.page {
            Page::Leaderboard => self.leaderboard.rows().len(),
            Page::Matches => self.matches.rows().len(),
            Page::Teams => self.teams.rows().len(),
            Page::Players => self.players.visible().len(),
            Page::Tournaments => self.tournaments.rows().len(),
            Page::Account => 0,
        }
    }

    pub fn scroll_down(&mut self) {
        if self.scroll + 1 < self.visible_count() {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn handle_async_response(&mut self, response: AsyncResponse) {
        match response {
            AsyncResponse::PageLoaded { visit, payload } => {
                if self.current_visit != Some(visit) {
                    debug!("Dropping result of stale visit {visit}");
                    return;
                }
                self.current_visit = None;
                match payload {
                    PagePayload::Leaderboard(state) => self.leaderboard = state,
                    PagePayload::Matches(state) => self.matches = state,
                    PagePayload::Teams(state) => self.teams = state,
                    PagePayload::Players(state) => self.players.rows = state,
                    PagePayload::Tournaments(state) => self.tournaments = state,
                }
            }
            AsyncResponse::AuthCompleted(result) => {
                self.account.submitting = false;
                match result {
                    Ok(session) => self.complete_sign_in(session),
                    Err(message) => self.account.error = Some(message),
                }
            }
        }
    }

    fn complete_sign_in(&mut self, session: Session) {
        let greeting = format!("Welcome, {}!", session.username);
        self.session.login(session);
        self.account.clear_inputs();
        self.account.notice = Some(greeting);
        // Landing view for a signed-in user
        self.visit(Page::Account);
    }

    // Players search

    pub fn players_focus_search(&mut self) {
        self.players.search_focused = true;
    }

    pub fn players_search_input(&mut self, c: char) {
        self.players.search_query.push(c);
        self.scroll = 0;
    }

    pub fn players_search_backspace(&mut self) {
        self.players.search_query.pop();
        self.scroll = 0;
    }

    pub fn players_search_clear(&mut self) {
        self.players.search_query.clear();
        self.players.search_focused = false;
        self.scroll = 0;
    }

    pub fn players_search_done(&mut self) {
        self.players.search_focused = false;
    }

    // Account forms

    pub fn account_input_char(&mut self, c: char) {
        let field = self.account.focused_field();
        self.account.value_mut(field).push(c);
    }

    pub fn account_delete_char(&mut self) {
        let field = self.account.focused_field();
        self.account.value_mut(field).pop();
    }

    pub fn account_next_field(&mut self) {
        self.account.focus = (self.account.focus + 1) % self.account.fields().len();
    }

    pub fn account_prev_field(&mut self) {
        let len = self.account.fields().len();
        self.account.focus = (self.account.focus + len - 1) % len;
    }

    pub fn account_toggle_mode(&mut self) {
        self.account.mode = match self.account.mode {
            AccountMode::SignIn => AccountMode::SignUp,
            AccountMode::SignUp => AccountMode::SignIn,
        };
        self.account.focus = 0;
        self.account.field_errors = FieldErrors::default();
        self.account.error = None;
    }

    /// Validates locally; only a valid form reaches the network.
    pub fn account_submit(&mut self) {
        if self.account.submitting {
            return;
        }
        self.account.error = None;
        self.account.notice = None;

        let request = match self.account.mode {
            AccountMode::SignUp => SignupForm {
                username: self.account.username.clone(),
                password: self.account.password.clone(),
                confirm_password: self.account.confirm_password.clone(),
            }
            .validate()
            .map(AsyncRequest::Register),
            AccountMode::SignIn => LoginForm {
                username: self.account.username.clone(),
                password: self.account.password.clone(),
            }
            .validate()
            .map(AsyncRequest::Login),
        };

        match request {
            Ok(request) => {
                self.account.field_errors = FieldErrors::default();
                self.account.submitting = true;
                let _ = self.async_tx.try_send(request);
            }
            Err(errors) => self.account.field_errors = errors,
        }
    }

    pub fn account_logout(&mut self) {
        self.session.logout();
        self.account.clear_inputs();
        self.account.notice = Some("Signed out.".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::LeaderboardEntry;
    use crate::error::LeagueError;

    fn app() -> (App, mpsc::Receiver<AsyncRequest>) {
        let (tx, rx) = mpsc::channel(32);
        (App::new(tx, SessionStore::in_memory()), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<AsyncRequest>) -> Vec<AsyncRequest> {
        let mut out = Vec::new();
        while let Ok(request) = rx.try_recv() {
            out.push(request);
        }
        out
    }

    fn entry() -> LeaderboardEntry {
        LeaderboardEntry {
            team_id: 1,
            team_name: "Reds".into(),
            matches_played: 1,
            wins: 1,
            draws: 0,
            losses: 0,
            goals_for: 2,
            total_points: 3,
        }
    }

    #[test]
    fn visiting_a_list_page_issues_one_fetch() {
        let (mut app, mut rx) = app();
        app.visit(Page::Leaderboard);

        let requests = drain(&mut rx);
        assert_eq!(requests.len(), 1);
        assert!(matches!(
            requests[0],
            AsyncRequest::Load { page: Page::Leaderboard, .. }
        ));
        assert!(app.leaderboard.is_loading());
    }

    #[test]
    fn leaving_a_page_cancels_its_visit() {
        let (mut app, mut rx) = app();
        app.visit(Page::Leaderboard);
        let first = app.current_visit.unwrap();
        app.visit(Page::Matches);

        let requests = drain(&mut rx);
        assert!(requests
            .iter()
            .any(|r| matches!(r, AsyncRequest::Cancel { visit } if *visit == first)));
    }

    #[test]
    fn stale_results_are_discarded() {
        let (mut app, _rx) = app();
        app.visit(Page::Leaderboard);
        let stale = app.current_visit.unwrap();
        app.visit(Page::Matches);
        app.visit(Page::Leaderboard);

        app.handle_async_response(AsyncResponse::PageLoaded {
            visit: stale,
            payload: PagePayload::Leaderboard(PageState::Ready(vec![entry()])),
        });
        assert!(app.leaderboard.is_loading());
    }

    #[test]
    fn leaderboard_failure_settles_to_empty() {
        let (mut app, _rx) = app();
        app.visit(Page::Leaderboard);
        let visit = app.current_visit.unwrap();

        app.handle_async_response(AsyncResponse::PageLoaded {
            visit,
            payload: PagePayload::Leaderboard(PageState::settle(
                "leaderboard",
                Err(LeagueError::RequestFailed(500)),
            )),
        });

        assert!(!app.is_busy());
        assert_eq!(app.visible_count(), 0);
    }

    #[test]
    fn invalid_signup_sends_nothing_and_flags_confirmation() {
        let (mut app, mut rx) = app();
        app.visit(Page::Account);
        drain(&mut rx);

        app.account_toggle_mode();
        for c in "alice".chars() {
            app.account_input_char(c);
        }
        app.account_next_field();
        for c in "secret1".chars() {
            app.account_input_char(c);
        }
        app.account_next_field();
        for c in "secret2".chars() {
            app.account_input_char(c);
        }
        app.account_submit();

        assert!(drain(&mut rx).is_empty());
        assert!(!app.account.submitting);
        assert_eq!(
            app.account.field_errors.get(Field::ConfirmPassword),
            Some("Passwords don't match")
        );
    }

    #[test]
    fn valid_signup_sends_register_and_success_logs_in() {
        let (mut app, mut rx) = app();
        app.visit(Page::Account);
        app.account_toggle_mode();
        app.account.username = "alice".into();
        app.account.password = "secret1".into();
        app.account.confirm_password = "secret1".into();
        app.account_submit();

        let requests = drain(&mut rx);
        assert_eq!(requests.len(), 1);
        match &requests[0] {
            AsyncRequest::Register(req) => assert_eq!(req.username, "alice"),
            other => panic!("unexpected request: {other:?}"),
        }

        app.handle_async_response(AsyncResponse::AuthCompleted(Ok(Session {
            id: 1,
            username: "alice".into(),
            role: "user".into(),
            token: "t".into(),
        })));
        assert!(app.session.is_logged_in());
        assert!(app.account.password.is_empty());
        assert_eq!(app.page, Page::Account);
    }

    #[test]
    fn failed_signup_keeps_form_editable() {
        let (mut app, _rx) = app();
        app.visit(Page::Account);
        app.account.username = "alice".into();
        app.account.password = "pw".into();
        app.account_submit();

        app.handle_async_response(AsyncResponse::AuthCompleted(Err("Login failed".into())));
        assert!(!app.account.submitting);
        assert_eq!(app.account.error.as_deref(), Some("Login failed"));
        assert_eq!(app.account.username, "alice");
    }

    #[test]
    fn page_cycle_wraps() {
        assert_eq!(Page::Account.next(), Page::Leaderboard);
        assert_eq!(Page::Leaderboard.prev(), Page::Account);
    }
}
