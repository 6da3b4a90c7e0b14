use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::core::client::LeagueClient;
use crate::core::forms::{LoginRequest, RegisterRequest, login_failure, registration_failure};
use crate::core::models::{LeaderboardEntry, Match, Player, Team, Tournament};
use crate::core::page::{PageState, PageVisit, load_page};
use crate::core::session::Session;
use crate::tui::app::Page;

/// Messages sent from the TUI to the async runtime
#[derive(Debug)]
pub enum AsyncRequest {
    /// Fetch the rows for one visit of `page`
    Load { visit: u64, page: Page },
    /// The view for `visit` is gone; abort its fetch
    Cancel { visit: u64 },
    Register(RegisterRequest),
    Login(LoginRequest),
}

/// Settled page contents
#[derive(Debug)]
pub enum PagePayload {
    Leaderboard(PageState<LeaderboardEntry>),
    Matches(PageState<Match>),
    Teams(PageState<Team>),
    Players(PageState<Player>),
    Tournaments(PageState<Tournament>),
}

/// Messages sent from the async runtime to the TUI
#[derive(Debug)]
pub enum AsyncResponse {
    PageLoaded { visit: u64, payload: PagePayload },
    /// Outcome of a sign-in or sign-up; errors are already user-facing text
    AuthCompleted(Result<Session, String>),
}

/// Bridge between sync TUI and async operations
pub struct AsyncBridge {
    request_rx: mpsc::Receiver<AsyncRequest>,
    response_tx: mpsc::Sender<AsyncResponse>,
    client: Arc<LeagueClient>,
    visits: HashMap<u64, PageVisit>,
}

impl AsyncBridge {
    pub fn new(
        request_rx: mpsc::Receiver<AsyncRequest>,
        response_tx: mpsc::Sender<AsyncResponse>,
        client: LeagueClient,
    ) -> Self {
        Self {
            request_rx,
            response_tx,
            client: Arc::new(client),
            visits: HashMap::new(),
        }
    }

    /// Serves requests until the TUI hangs up. Pending visits are aborted
    /// when the bridge is dropped.
    pub async fn run(mut self) {
        while let Some(request) = self.request_rx.recv().await {
            debug!("Received async request: {request:?}");
            self.visits.retain(|_, visit| !visit.is_finished());

            match request {
                AsyncRequest::Load { visit, page } => self.start_visit(visit, page),
                AsyncRequest::Cancel { visit } => {
                    if let Some(pending) = self.visits.remove(&visit) {
                        pending.cancel();
                    }
                }
                AsyncRequest::Register(request) => {
                    let client = self.client.clone();
                    let response_tx = self.response_tx.clone();
                    tokio::spawn(async move {
                        let result = client
                            .register(&request)
                            .await
                            .map_err(|e| registration_failure(&e));
                        let _ = response_tx.send(AsyncResponse::AuthCompleted(result)).await;
                    });
                }
                AsyncRequest::Login(request) => {
                    let client = self.client.clone();
                    let response_tx = self.response_tx.clone();
                    tokio::spawn(async move {
                        let result = client
                            .login(&request)
                            .await
                            .map_err(|e| login_failure(&e));
                        let _ = response_tx.send(AsyncResponse::AuthCompleted(result)).await;
                    });
                }
            }
        }
    }

    fn start_visit(&mut self, visit: u64, page: Page) {
        let client = self.client.clone();
        let response_tx = self.response_tx.clone();

        let task = PageVisit::spawn(visit, async move {
            if let Some(payload) = fetch_page(&client, page).await {
                let _ = response_tx
                    .send(AsyncResponse::PageLoaded { visit, payload })
                    .await;
            }
        });
        self.visits.insert(visit, task);
    }
}

/// Issues the single fetch behind `page`
pub async fn fetch_page(client: &LeagueClient, page: Page) -> Option<PagePayload> {
    let payload = match page {
        Page::Leaderboard => {
            PagePayload::Leaderboard(load_page("leaderboard", client.leaderboard()).await)
        }
        Page::Matches => PagePayload::Matches(load_page("matches", client.matches()).await),
        Page::Teams => PagePayload::Teams(load_page("teams", client.teams()).await),
        Page::Players => PagePayload::Players(load_page("players", client.players()).await),
        Page::Tournaments => {
            PagePayload::Tournaments(load_page("tournaments", client.tournaments()).await)
        }
        Page::Account => return None,
    };
    Some(payload)
}
