//! Application context.
//!
//! DESIGN
//! ======
//! `App` is the one explicitly constructed object that wires storage, the
//! navigator, the session, the HTTP client, the route table and the guard
//! together. It is built once at startup and lives for the process; there is
//! no ambient global session.
//!
//! Navigation goes through `App::navigate`: the path is resolved against the
//! route table, the guard decides, and the navigator receives either the
//! requested path or the redirect target.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{AdminApi, BooksApi, BorrowsApi, UsersApi};
use crate::auth::SessionStore;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::guard::{GuardDecision, RouteGuard};
use crate::http::HttpClient;
use crate::navigation::{History, Navigator};
use crate::router::{RouteTable, normalize_path};
use crate::session::{HOME_PATH, SessionContext};
use crate::storage::{FileStore, KeyValueStore};

// =============================================================================
// NAVIGATION OUTCOME
// =============================================================================

/// Where a navigation attempt ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Arrived { path: String, name: &'static str, params: BTreeMap<String, String> },
    /// The guard refused `from` and sent the navigator to `to` instead.
    Redirected { from: String, to: &'static str },
    /// No route matches; the navigator was not called.
    NotFound { path: String },
}

impl Navigation {
    /// The location the navigator ends on, if it moved.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Arrived { path, .. } => Some(path),
            Self::Redirected { to, .. } => Some(to),
            Self::NotFound { .. } => None,
        }
    }
}

// =============================================================================
// APP
// =============================================================================

pub struct App {
    config: ClientConfig,
    session: Arc<SessionContext>,
    store: SessionStore,
    http: HttpClient,
    routes: RouteTable,
    guard: RouteGuard,
    navigator: Arc<dyn Navigator>,
}

impl App {
    /// Wire the context from explicit collaborators. The session is seeded
    /// from `storage` here; nothing touches the network until `bootstrap`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is not an HTTP(S) URL.
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let session = Arc::new(SessionContext::new(storage, navigator.clone()));
        let http = HttpClient::new(&config.base_url, session.clone())?;
        let store = SessionStore::new(http.clone());
        let guard = RouteGuard::new(session.clone());
        Ok(Self { config, session, store, http, routes: RouteTable::library(), guard, navigator })
    }

    /// Production wiring: a file-backed store at `config.session_file` and an
    /// in-process history starting at `/`.
    ///
    /// # Errors
    ///
    /// See [`App::new`].
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let storage = Arc::new(FileStore::new(config.session_file.clone()));
        let navigator = Arc::new(History::new(HOME_PATH));
        Self::new(config, storage, navigator)
    }

    /// Prime the session for use. With `check_on_startup` the stored token is
    /// re-validated against the server; otherwise it is trusted as-is.
    pub async fn bootstrap(&self) {
        if self.config.check_on_startup {
            self.store.init().await;
        } else if self.session.is_authenticated() {
            tracing::debug!("skipping startup check; using stored token as-is");
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Attempt to navigate to `path` through the guard.
    pub fn navigate(&self, path: &str) -> Navigation {
        let Some(target) = self.routes.resolve(path) else {
            let path = normalize_path(path);
            tracing::info!(%path, "no route matches");
            return Navigation::NotFound { path };
        };

        match self.guard.check(&target) {
            GuardDecision::Proceed => {
                self.navigator.navigate(&target.path);
                Navigation::Arrived { name: target.route().name, params: target.params.clone(), path: target.path }
            }
            GuardDecision::Redirect(to) => {
                self.navigator.navigate(to);
                Navigation::Redirected { from: target.path, to }
            }
        }
    }

    #[must_use]
    pub fn books(&self) -> BooksApi<'_> {
        BooksApi::new(&self.http)
    }

    #[must_use]
    pub fn borrows(&self) -> BorrowsApi<'_> {
        BorrowsApi::new(&self.http)
    }

    #[must_use]
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(&self.http)
    }

    #[must_use]
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(&self.http)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
