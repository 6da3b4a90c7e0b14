use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use leaguedesk::config::{Settings, parse_base_url};
use leaguedesk::core::client::LeagueClient;
use leaguedesk::core::forms::{FormError, SignupForm, submit_signup};
use leaguedesk::core::page::{PageState, load_page};
use leaguedesk::core::session::SessionStore;
use leaguedesk::tui::app::Page;
use leaguedesk::tui::async_bridge::{PagePayload, fetch_page};

/// A base URL nothing listens on
fn closed_port_settings() -> Settings {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    Settings {
        api_url: parse_base_url(&format!("http://127.0.0.1:{port}/api")).unwrap(),
        state_dir: PathBuf::from("unused"),
        timeout: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn leaderboard_failure_renders_zero_rows() {
    let client = LeagueClient::new(&closed_port_settings(), SessionStore::in_memory()).unwrap();

    let state = load_page("leaderboard", client.leaderboard()).await;

    assert!(!state.is_loading());
    assert!(state.rows().is_empty());
    assert!(matches!(state, PageState::Failed(_)));
}

#[tokio::test]
async fn tui_fetch_settles_failed_page() {
    let client = LeagueClient::new(&closed_port_settings(), SessionStore::in_memory()).unwrap();

    match fetch_page(&client, Page::Matches).await {
        Some(PagePayload::Matches(state)) => {
            assert!(!state.is_loading());
            assert!(state.rows().is_empty());
        }
        other => panic!("unexpected payload: {other:?}"),
    }
    assert!(fetch_page(&client, Page::Account).await.is_none());
}

#[tokio::test]
async fn signup_network_failure_shows_fallback_and_keeps_session_empty() {
    let store = SessionStore::in_memory();
    let client = LeagueClient::new(&closed_port_settings(), store.clone()).unwrap();
    let form = SignupForm {
        username: "alice".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
    };

    match submit_signup(&form, &client, &store).await {
        Err(FormError::Rejected(message)) => assert_eq!(message, "Registration failed"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!store.is_logged_in());
}
