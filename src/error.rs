use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response whose body carried a `message`
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed with status {0}")]
    RequestFailed(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Invalid(String),

    #[error("Not logged in")]
    NotLoggedIn,
}

impl LeagueError {
    /// Text to show the user: the server's message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            LeagueError::Api { message, .. } => message.clone(),
            LeagueError::Invalid(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
