use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{LeagueError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const STATE_DIR: &str = "leaguedesk";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Resolved runtime settings shared by the CLI and the TUI
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: Url,
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

impl Settings {
    /// Build settings from the (possibly env-sourced) CLI values.
    pub fn resolve(api_url: &str, state_dir: Option<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.or_else(default_state_dir).ok_or_else(|| {
            LeagueError::Invalid(
                "No state directory: set --state-dir, LEAGUEDESK_STATE_DIR or HOME".into(),
            )
        })?;

        Ok(Self {
            api_url: parse_base_url(api_url)?,
            state_dir,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        })
    }
}

/// Parses the API base URL, forcing a trailing slash so relative joins
/// keep the path prefix (e.g. `/api` + `teams` -> `/api/teams`).
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_state_dir() -> Option<PathBuf> {
    // Prefer XDG config.
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(STATE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".config").join(STATE_DIR))
}
