use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::Result;

/// Fetch-on-mount state of a list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState<T> {
    Loading,
    Ready(Vec<T>),
    /// Fetch failed; renders as an empty list
    Failed(String),
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading
    }
}

impl<T> PageState<T> {
    /// Settles a finished fetch. Failures are logged and downgraded.
    pub fn settle(what: &str, result: Result<Vec<T>>) -> Self {
        match result {
            Ok(rows) => {
                debug!("Loaded {} {what}", rows.len());
                PageState::Ready(rows)
            }
            Err(e) => {
                error!("Failed to fetch {what}: {e}");
                PageState::Failed(e.to_string())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    /// Rows to render; empty while loading or after a failure
    pub fn rows(&self) -> &[T] {
        match self {
            PageState::Ready(rows) => rows,
            PageState::Loading | PageState::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Awaits a single page fetch and settles it.
pub async fn load_page<T, F>(what: &str, fetch: F) -> PageState<T>
where
    F: Future<Output = Result<Vec<T>>>,
{
    PageState::settle(what, fetch.await)
}

/// One visit to a view. Owns the in-flight fetch; dropping the visit
/// aborts it so nothing is delivered after the view is gone.
#[derive(Debug)]
pub struct PageVisit {
    id: u64,
    handle: JoinHandle<()>,
}

impl PageVisit {
    /// Spawns `task` on the current tokio runtime.
    pub fn spawn<F>(id: u64, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            id,
            handle: tokio::spawn(task),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        // Drop does the work
    }
}

impl Drop for PageVisit {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Cancelling page visit {}", self.id);
            self.handle.abort();
        }
    }
}
