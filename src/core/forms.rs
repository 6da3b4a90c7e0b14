use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::core::session::{Session, SessionStore};
use crate::error::Result;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

const REGISTRATION_FALLBACK: &str = "Registration failed";
const LOGIN_FALLBACK: &str = "Login failed";

/// Auth endpoints a form submits to
pub trait AuthBackend: Send + Sync {
    fn register<'a>(
        &'a self,
        request: &'a RegisterRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>>;

    fn login<'a>(
        &'a self,
        request: &'a LoginRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
        }
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        // First failing rule wins per field
        self.0.entry(field).or_insert_with(|| message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {msg}", field.label()))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    /// Caught before any request was sent
    #[error("{0}")]
    Invalid(FieldErrors),

    /// The server (or the network) rejected the submission
    #[error("{0}")]
    Rejected(String),
}

/// Payload of `POST /auth/register`. The confirmation never leaves the
/// client.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Payload of `POST /auth/login`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> std::result::Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.username.chars().count() < MIN_USERNAME_LEN {
            errors.insert(Field::Username, "Username must be at least 3 characters");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(Field::Password, "Password must be at least 6 characters");
        }
        if self.password != self.confirm_password {
            errors.insert(Field::ConfirmPassword, "Passwords don't match");
        }

        if errors.is_empty() {
            Ok(RegisterRequest {
                username: self.username.clone(),
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> std::result::Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.username.trim().is_empty() {
            errors.insert(Field::Username, "Username is required");
        }
        if self.password.is_empty() {
            errors.insert(Field::Password, "Password is required");
        }

        if errors.is_empty() {
            Ok(LoginRequest {
                username: self.username.trim().to_string(),
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Validates, registers, and on success stores the returned session.
pub async fn submit_signup(
    form: &SignupForm,
    backend: &dyn AuthBackend,
    store: &SessionStore,
) -> std::result::Result<Session, FormError> {
    let request = form.validate().map_err(FormError::Invalid)?;

    match backend.register(&request).await {
        Ok(session) => {
            store.login(session.clone());
            Ok(session)
        }
        Err(e) => {
            error!("Signup error: {e}");
            Err(FormError::Rejected(e.user_message(REGISTRATION_FALLBACK)))
        }
    }
}

/// Validates, signs in, and on success stores the returned session.
pub async fn submit_login(
    form: &LoginForm,
    backend: &dyn AuthBackend,
    store: &SessionStore,
) -> std::result::Result<Session, FormError> {
    let request = form.validate().map_err(FormError::Invalid)?;

    match backend.login(&request).await {
        Ok(session) => {
            store.login(session.clone());
            Ok(session)
        }
        Err(e) => {
            error!("Login error: {e}");
            Err(FormError::Rejected(e.user_message(LOGIN_FALLBACK)))
        }
    }
}

/// Message shown for a rejected registration with no server text
pub fn registration_failure(err: &crate::error::LeagueError) -> String {
    err.user_message(REGISTRATION_FALLBACK)
}

/// Message shown for a rejected login with no server text
pub fn login_failure(err: &crate::error::LeagueError) -> String {
    err.user_message(LOGIN_FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeagueError;
    use std::sync::Mutex;

    /// Records every payload it receives
    struct RecordingBackend {
        calls: Mutex<Vec<serde_json::Value>>,
        reject_with: Option<String>,
    }

    impl RecordingBackend {
        fn accepting() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reject_with: None,
            }
        }

        fn rejecting(message: Option<&str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reject_with: Some(message.unwrap_or_default().to_string()),
            }
        }

        fn respond(&self, body: serde_json::Value, username: &str) -> Result<Session> {
            self.calls.lock().unwrap().push(body);
            match &self.reject_with {
                Some(msg) if msg.is_empty() => Err(LeagueError::RequestFailed(500)),
                Some(msg) => Err(LeagueError::Api {
                    status: 400,
                    message: msg.clone(),
                }),
                None => Ok(Session {
                    id: 42,
                    username: username.to_string(),
                    role: "user".into(),
                    token: "fresh-token".into(),
                }),
            }
        }

        fn calls(&self) -> Vec<serde_json::Value> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AuthBackend for RecordingBackend {
        fn register<'a>(
            &'a self,
            request: &'a RegisterRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>> {
            let body = serde_json::to_value(request).unwrap();
            Box::pin(async move { self.respond(body, &request.username) })
        }

        fn login<'a>(
            &'a self,
            request: &'a LoginRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>> {
            let body = serde_json::to_value(request).unwrap();
            Box::pin(async move { self.respond(body, &request.username) })
        }
    }

    fn signup(username: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn valid_signup_sends_exactly_one_request_without_confirmation() {
        let backend = RecordingBackend::accepting();
        let store = SessionStore::in_memory();

        let session = submit_signup(&signup("alice", "secret1", "secret1"), &backend, &store)
            .await
            .unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            serde_json::json!({"username": "alice", "password": "secret1"})
        );
        assert_eq!(store.current(), Some(session));
        assert_eq!(store.credential().as_deref(), Some("fresh-token"));
    }

    #[tokio::test]
    async fn mismatched_confirmation_sends_nothing() {
        let backend = RecordingBackend::accepting();
        let store = SessionStore::in_memory();

        let err = submit_signup(&signup("alice", "secret1", "secret2"), &backend, &store)
            .await
            .unwrap_err();

        assert!(backend.calls().is_empty());
        assert!(!store.is_logged_in());
        match err {
            FormError::Invalid(errors) => {
                assert_eq!(
                    errors.get(Field::ConfirmPassword),
                    Some("Passwords don't match")
                );
                assert_eq!(errors.get(Field::Password), None);
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn short_fields_report_each_rule() {
        let errors = signup("al", "12345", "12345").validate().unwrap_err();
        assert_eq!(
            errors.get(Field::Username),
            Some("Username must be at least 3 characters")
        );
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(errors.get(Field::ConfirmPassword), None);
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        assert!(signup("abc", "123456", "123456").validate().is_ok());
    }

    #[tokio::test]
    async fn server_message_is_shown_and_form_can_resubmit() {
        let backend = RecordingBackend::rejecting(Some("Username already exists"));
        let store = SessionStore::in_memory();
        let form = signup("alice", "secret1", "secret1");

        let err = submit_signup(&form, &backend, &store).await.unwrap_err();
        assert_eq!(err.to_string(), "Username already exists");

        let _ = submit_signup(&form, &backend, &store).await;
        assert_eq!(backend.calls().len(), 2);
        assert!(!store.is_logged_in());
    }

    #[tokio::test]
    async fn generic_failure_uses_fallback_text() {
        let backend = RecordingBackend::rejecting(None);
        let store = SessionStore::in_memory();

        let err = submit_signup(&signup("alice", "secret1", "secret1"), &backend, &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Registration failed");
    }

    #[tokio::test]
    async fn login_requires_both_fields_and_stores_session() {
        let backend = RecordingBackend::accepting();
        let store = SessionStore::in_memory();

        let empty = LoginForm::default();
        assert!(submit_login(&empty, &backend, &store).await.is_err());
        assert!(backend.calls().is_empty());

        let form = LoginForm {
            username: " bob ".into(),
            password: "pw".into(),
        };
        submit_login(&form, &backend, &store).await.unwrap();
        assert_eq!(backend.calls()[0]["username"], "bob");
        assert_eq!(store.current().unwrap().username, "bob");
    }
}
