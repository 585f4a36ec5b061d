//! Session lifecycle: login, register, logout, init and re-validation.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is what the front-end talks to. It pairs the shared
//! `SessionContext` with the `HttpClient` and turns every network outcome
//! into a plain result the UI can branch on.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns `ClientError`. Transport failures, `success: false`
//! envelopes and 401/403 statuses are all caught and logged; `login` reports
//! a `LoginOutcome`, `register` and `check_auth` report booleans.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use serde::Serialize;

use crate::http::HttpClient;
use crate::session::{Session, SessionContext, token_preview};
use crate::types::{LoginData, LoginRequest, UserSummary};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";
pub const CHECK_ENDPOINT: &str = "/api/auth/check";

/// Result of a login attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(UserSummary),
    /// The session was left untouched. `message` is the server's, when it sent one.
    Failure { message: Option<String> },
}

impl LoginOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    session: Arc<SessionContext>,
    http: HttpClient,
}

impl SessionStore {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { session: http.session().clone(), http }
    }

    #[must_use]
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserSummary> {
        self.session.user()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    /// Re-validate the token restored from storage. The HTTP client already
    /// attaches it, since it reads the session on every request.
    /// No-op when nothing was restored.
    pub async fn init(&self) {
        let Some(token) = self.session.token() else {
            tracing::debug!("no stored token; skipping session init");
            return;
        };
        tracing::info!(token = token_preview(&token), "restoring stored session");
        self.check_auth().await;
    }

    /// Authenticate against the backend and install the returned identity.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        tracing::info!(%username, "login attempt");
        let body = LoginRequest { username: username.to_owned(), password: password.to_owned() };

        let envelope = match self.http.post::<LoginData, _>(LOGIN_ENDPOINT, &body).await {
            Ok(envelope) => envelope,
            Err(e) => {
                let message = e.server_message();
                if e.is_server_rejection() {
                    tracing::warn!(%username, status = e.status(), message = message.as_deref(), "login rejected");
                } else {
                    tracing::warn!(%username, error = %e, "login request failed");
                }
                return LoginOutcome::Failure { message };
            }
        };

        if !envelope.success {
            tracing::warn!(%username, message = envelope.message.as_deref(), "login rejected");
            return LoginOutcome::Failure { message: envelope.message };
        }
        let Some(data) = envelope.data else {
            tracing::warn!(%username, "login response carried no data");
            return LoginOutcome::Failure { message: envelope.message };
        };

        let (user, token) = data.into_parts();
        tracing::info!(%username, role = %user.role, token = token_preview(&token), "login succeeded");
        self.session.install(user.clone(), token);
        LoginOutcome::Success(user)
    }

    /// Submit a registration payload. Registration does not log in.
    pub async fn register<T: Serialize + ?Sized>(&self, user_data: &T) -> bool {
        match self.http.post::<serde_json::Value, _>(REGISTER_ENDPOINT, user_data).await {
            Ok(envelope) => {
                if !envelope.success {
                    tracing::warn!(message = envelope.message.as_deref(), "registration rejected");
                }
                envelope.success
            }
            Err(e) => {
                tracing::warn!(error = %e, message = e.server_message().as_deref(), "registration failed");
                false
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Ask the backend whether the current token is still valid.
    ///
    /// Logs out when the server says no or answers 401/403. A 401 has already
    /// been handled by the response interceptor, so only 403 logs out here.
    pub async fn check_auth(&self) -> bool {
        match self.http.get::<serde_json::Value>(CHECK_ENDPOINT, &[]).await {
            Ok(envelope) if envelope.success => {
                tracing::debug!("session confirmed by server");
                true
            }
            Ok(envelope) => {
                tracing::warn!(message = envelope.message.as_deref(), "session no longer valid; logging out");
                self.session.logout();
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "session check failed");
                if e.status() == Some(403) {
                    self.session.logout();
                }
                false
            }
        }
    }
}
