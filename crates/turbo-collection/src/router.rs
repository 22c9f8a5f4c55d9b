//! Host URL surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use turbo_catalog::search::QueryParams;

/// The host's view of the current URL query.
pub trait Router: Send + Sync {
    /// Whether the URL has been parsed; no fetch is issued before this.
    ///
    /// There is no readiness callback. A host whose router becomes ready
    /// after [`CollectionEngine::init`](crate::CollectionEngine::init)
    /// returned `Deferred` calls `init` again at that point.
    fn is_ready(&self) -> bool;

    /// Current query parameters.
    fn query(&self) -> QueryParams;

    /// Replace the query without a full navigation.
    fn replace(&self, query: QueryParams);
}

/// Router backed by memory, for tests and command-line hosts.
#[derive(Debug)]
pub struct MemoryRouter {
    path: String,
    ready: AtomicBool,
    query: Mutex<QueryParams>,
    history: Mutex<Vec<String>>,
}

impl MemoryRouter {
    /// A ready router at `path` with the given query string.
    pub fn new(path: impl Into<String>, query: &str) -> Self {
        Self {
            path: path.into(),
            ready: AtomicBool::new(true),
            query: Mutex::new(QueryParams::parse(query)),
            history: Mutex::new(Vec::new()),
        }
    }

    /// A router whose URL has not been resolved yet.
    pub fn pending(path: impl Into<String>) -> Self {
        let router = Self::new(path, "");
        router.ready.store(false, Ordering::SeqCst);
        router
    }

    /// Resolve the URL of a pending router.
    pub fn resolve(&self, query: &str) {
        *self.query.lock().unwrap_or_else(PoisonError::into_inner) = QueryParams::parse(query);
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Current URL as `path?query`.
    pub fn url(&self) -> String {
        let query = self.query().to_query_string();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    /// Query strings written by `replace`, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Router for MemoryRouter {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn query(&self) -> QueryParams {
        self.query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, query: QueryParams) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_query_string());
        *self.query.lock().unwrap_or_else(PoisonError::into_inner) = query;
    }
}
