//! Process-wide authentication state and its persisted mirror.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionContext` is constructed once at bootstrap and shared by `Arc` with
//! the HTTP client (which reads the bearer token and forces logout on 401) and
//! the route guard (which reads the derived flags). It is the only owner of
//! authentication truth; neither collaborator keeps a copy.
//!
//! DESIGN
//! ======
//! Only the token gates authentication. A stored `user` without a `token` is
//! unauthenticated; a `token` without a `user` is authenticated but never
//! admin. The derived flags are plain functions of the current state.
//!
//! The in-memory state sits behind a `RwLock` that is only held for the
//! duration of a field read or write, never across an `.await`.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use crate::navigation::Navigator;
use crate::storage::KeyValueStore;
use crate::types::UserSummary;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";
pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// The client's belief about who is logged in and with what credential.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<UserSummary>,
    pub token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.role.is_admin())
    }
}

/// Short token prefix safe to put in logs.
pub(crate) fn token_preview(token: &str) -> &str {
    match token.char_indices().nth(8) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

pub struct SessionContext {
    state: RwLock<Session>,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    /// Create the context, seeding it from the persisted mirror.
    pub fn new(storage: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        let session = load_persisted(storage.as_ref());
        tracing::info!(
            has_user = session.user.is_some(),
            has_token = session.token.is_some(),
            "session seeded from storage"
        );
        Self { state: RwLock::new(session), storage, navigator }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Session {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).is_admin()
    }

    /// Set or clear the bearer token the HTTP client attaches to requests.
    ///
    /// The client reads the token per request, so this is all it takes to
    /// change the `Authorization` header. It does not touch storage.
    pub fn set_auth_token(&self, token: Option<String>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply_token(&mut state, token);
    }

    /// Install a freshly authenticated identity in memory and in storage.
    ///
    /// Storage failures are logged and do not undo the in-memory login.
    pub(crate) fn install(&self, user: UserSummary, token: String) {
        let user_json = serde_json::to_string(&user);
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.user = Some(user);
            apply_token(&mut state, Some(token.clone()));
        }

        match user_json {
            Ok(json) => {
                if let Err(e) = self.storage.set(USER_KEY, &json) {
                    tracing::warn!(error = %e, "failed to persist session user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode session user"),
        }
        if let Err(e) = self.storage.set(TOKEN_KEY, &token) {
            tracing::warn!(error = %e, "failed to persist session token");
        }
    }

    /// Drop the identity everywhere and send the user to the login page.
    ///
    /// Safe to call when already logged out; the navigation always fires.
    pub fn logout(&self) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            tracing::info!(was_authenticated = state.is_authenticated(), "logging out");
            state.user = None;
            apply_token(&mut state, None);
        }

        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear persisted session entry");
            }
        }
        self.navigator.navigate(LOGIN_PATH);
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.snapshot();
        f.debug_struct("SessionContext")
            .field("user", &session.user)
            .field("token", &session.token.as_deref().map(token_preview))
            .finish_non_exhaustive()
    }
}

/// Token writes share this so both fields change under one guard.
fn apply_token(state: &mut Session, token: Option<String>) {
    match token.as_deref() {
        Some(t) => tracing::debug!(token = token_preview(t), "bearer token configured"),
        None => tracing::debug!("bearer token cleared"),
    }
    state.token = token;
}

/// Read both persisted entries independently; anything absent, unreadable or
/// malformed seeds an absent field.
fn load_persisted(storage: &dyn KeyValueStore) -> Session {
    let user = match storage.get(USER_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<UserSummary>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "persisted user is malformed; ignoring");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted user");
            None
        }
    };

    let token = match storage.get(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted token");
            None
        }
    };

    Session { user, token }
}
