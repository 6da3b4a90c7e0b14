use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::storage::{MemoryStorage, Storage};

/// Storage key holding the bearer credential as plain text
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized session snapshot
pub const SNAPSHOT_KEY: &str = "auth-storage";

const SNAPSHOT_VERSION: u32 = 1;

/// The authenticated user, as returned by the auth endpoints
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: u64,
    pub username: String,
    pub role: String,
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    user: Option<Session>,
}

/// Shared handle to the current session.
///
/// Cloning is cheap and every clone sees the same state. `login` and
/// `logout` are the only writers and the only places that touch durable
/// storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Opens the store, hydrating from the persisted snapshot.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let hydrated = read_snapshot(storage.as_ref());
        match &hydrated {
            Some(session) => debug!("Hydrated session for {}", session.username),
            None => debug!("No persisted session"),
        }

        Self {
            storage,
            current: Arc::new(RwLock::new(hydrated)),
        }
    }

    /// A store backed by process memory only
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()))
    }

    /// Replaces the current session unconditionally.
    ///
    /// Storage failures are logged and otherwise ignored.
    pub fn login(&self, session: Session) {
        let mut current = self.write();

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            user: Some(session.clone()),
        };
        if let Err(e) = self.storage.set(TOKEN_KEY, &session.token) {
            warn!("Failed to persist credential: {e}");
        }
        self.save_snapshot(&snapshot);

        info!("Logged in as {} ({})", session.username, session.role);
        *current = Some(session);
    }

    /// Clears the current session. Calling it while logged out is a no-op
    /// apart from re-clearing storage.
    pub fn logout(&self) {
        let mut current = self.write();

        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!("Failed to remove credential: {e}");
        }
        self.save_snapshot(&Snapshot {
            version: SNAPSHOT_VERSION,
            user: None,
        });

        if let Some(previous) = current.take() {
            info!("Logged out {}", previous.username);
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().is_some()
    }

    /// The bearer credential for outgoing requests.
    ///
    /// Falls back to the raw `token` key so a credential written by an
    /// earlier process is still attached before a snapshot exists.
    pub fn credential(&self) -> Option<String> {
        if let Some(session) = self.read().as_ref() {
            return Some(session.token.clone());
        }
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read credential: {e}");
                None
            }
        }
    }

    fn save_snapshot(&self, snapshot: &Snapshot) {
        let result = serde_json::to_string(snapshot)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                self.storage
                    .set(SNAPSHOT_KEY, &raw)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!("Failed to persist session snapshot: {e}");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn read_snapshot(storage: &dyn Storage) -> Option<Session> {
    let raw = match storage.get(SNAPSHOT_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("Failed to read session snapshot: {e}");
            return None;
        }
    };
    let snapshot: Snapshot = match serde_json::from_str(&raw) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Ignoring unreadable session snapshot: {e}");
            return None;
        }
    };
    if snapshot.version != SNAPSHOT_VERSION {
        debug!("Ignoring session snapshot version {}", snapshot.version);
        return None;
    }
    snapshot.user
}
