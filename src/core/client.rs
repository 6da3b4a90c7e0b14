use std::future::Future;
use std::pin::Pin;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::config::Settings;
use crate::core::forms::{AuthBackend, LoginRequest, RegisterRequest};
use crate::core::models::{
    LeaderboardEntry, Match, MatchResult, NewMatch, NewPlayer, NewTeam, NewTournament, Player,
    Team, Tournament, WinPercentage,
};
use crate::core::session::{Session, SessionStore};
use crate::error::{LeagueError, Result};

const USER_AGENT: &str = concat!("leaguedesk/", env!("CARGO_PKG_VERSION"));

/// Uniform response wrapper used by every endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of mutation responses and error responses, where `data` may be
/// absent or uninteresting
#[derive(Debug, Deserialize, Default)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

pub struct LeagueClient {
    http: reqwest::Client,
    base: Url,
    session: SessionStore,
}

impl LeagueClient {
    pub fn new(settings: &Settings, session: SessionStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http,
            base: settings.api_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Builds a request with the current credential attached, if any.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let builder = self.http.request(method, url);
        Ok(match self.session.credential() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<(u16, String)> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// GET `path` and unwrap the envelope's `data`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (status, body) = self.send(self.request(Method::GET, path)?).await?;
        decode_envelope::<T>(status, &body).map(|envelope| envelope.data)
    }

    /// POST a JSON body to `path` and unwrap the envelope's `data`
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        let (status, text) = self.send(builder).await?;
        decode_envelope::<T>(status, &text).map(|envelope| envelope.data)
    }

    /// Send an authenticated mutation whose response payload is not
    /// needed; returns the server's message if it sent one.
    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<String>> {
        if self.session.credential().is_none() {
            return Err(LeagueError::NotLoggedIn);
        }
        let mut builder = self.request(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let (status, text) = self.send(builder).await?;
        check_status(status, &text)?;
        let ack: MessageBody = serde_json::from_str(&text).unwrap_or_default();
        Ok(ack.message)
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.get("leaderboard").await
    }

    pub async fn matches(&self) -> Result<Vec<Match>> {
        self.get("matches").await
    }

    pub async fn teams(&self) -> Result<Vec<Team>> {
        self.get("teams").await
    }

    pub async fn players(&self) -> Result<Vec<Player>> {
        self.get("players").await
    }

    pub async fn tournaments(&self) -> Result<Vec<Tournament>> {
        self.get("tournaments").await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Session> {
        info!("Registering {}", request.username);
        self.post("auth/register", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Session> {
        info!("Signing in {}", request.username);
        self.post("auth/login", request).await
    }

    pub async fn create_team(&self, team: &NewTeam) -> Result<Option<String>> {
        team.validate()?;
        self.mutate(Method::POST, "teams", Some(team)).await
    }

    pub async fn delete_team(&self, team_id: u64) -> Result<Option<String>> {
        self.mutate::<()>(Method::DELETE, &format!("teams/{team_id}"), None)
            .await
    }

    pub async fn create_match(&self, new_match: &NewMatch) -> Result<Option<String>> {
        new_match.validate()?;
        self.mutate(Method::POST, "matches", Some(new_match)).await
    }

    pub async fn record_result(
        &self,
        match_id: u64,
        result: &MatchResult,
    ) -> Result<Option<String>> {
        self.mutate(
            Method::POST,
            &format!("matches/{match_id}/result"),
            Some(result),
        )
        .await
    }

    pub async fn win_percentage(&self, team_id: u64) -> Result<WinPercentage> {
        self.get(&format!("teams/{team_id}/win-percentage")).await
    }

    pub async fn create_player(&self, player: &NewPlayer) -> Result<Option<String>> {
        player.validate()?;
        self.mutate(Method::POST, "players", Some(player)).await
    }

    pub async fn update_player(
        &self,
        player_id: u64,
        player: &NewPlayer,
    ) -> Result<Option<String>> {
        player.validate()?;
        self.mutate(Method::PUT, &format!("players/{player_id}"), Some(player))
            .await
    }

    pub async fn delete_player(&self, player_id: u64) -> Result<Option<String>> {
        self.mutate::<()>(Method::DELETE, &format!("players/{player_id}"), None)
            .await
    }

    pub async fn create_tournament(&self, tournament: &NewTournament) -> Result<Option<String>> {
        tournament.validate()?;
        self.mutate(Method::POST, "tournaments", Some(tournament))
            .await
    }

    pub async fn update_tournament(
        &self,
        tournament_id: u64,
        tournament: &NewTournament,
    ) -> Result<Option<String>> {
        tournament.validate()?;
        self.mutate(
            Method::PUT,
            &format!("tournaments/{tournament_id}"),
            Some(tournament),
        )
        .await
    }

    pub async fn delete_tournament(&self, tournament_id: u64) -> Result<Option<String>> {
        self.mutate::<()>(
            Method::DELETE,
            &format!("tournaments/{tournament_id}"),
            None,
        )
        .await
    }
}

impl AuthBackend for LeagueClient {
    fn register<'a>(
        &'a self,
        request: &'a RegisterRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>> {
        Box::pin(LeagueClient::register(self, request))
    }

    fn login<'a>(
        &'a self,
        request: &'a LoginRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>> {
        Box::pin(LeagueClient::login(self, request))
    }
}

/// Maps a non-2xx status to an error carrying the server's message when
/// the body has one.
fn check_status(status: u16, body: &str) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = serde_json::from_str::<MessageBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    Err(match message {
        Some(message) => LeagueError::Api { status, message },
        None => LeagueError::RequestFailed(status),
    })
}

pub(crate) fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<Envelope<T>> {
    check_status(status, body)?;
    serde_json::from_str(body).map_err(|e| {
        LeagueError::Parse(format!(
            "Unexpected response shape: {e} - Response: {}",
            truncate_body(body)
        ))
    })
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(300) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
