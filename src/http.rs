//! Shared HTTP client with auth interceptors.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every REST call in the crate goes through `HttpClient`. It owns the base
//! address and applies two cross-cutting behaviors:
//!
//! - outgoing: attach `Authorization: Bearer <token>` whenever the session
//!   holds a token;
//! - incoming: a 401 forces `SessionContext::logout` before the error is
//!   returned to the caller.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ClientError::Status` with the raw body kept so
//! callers can still read a `{ success: false, message }` envelope. There is
//! no retry: every failure is terminal for that call.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::session::SessionContext;
use crate::types::ApiEnvelope;

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl HttpClient {
    /// Build a client rooted at `base_url` (`http://` or `https://`).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL has no HTTP scheme or the underlying
    /// client cannot be constructed.
    pub fn new(base_url: &str, session: Arc<SessionContext>) -> Result<Self, ClientError> {
        let base_url = crate::config::normalize_base_url(base_url);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base_url, session })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request with the outgoing interceptor applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        self.authorize(builder)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) if !token.is_empty() => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            _ => builder,
        }
    }

    /// Send a prepared request and decode the API envelope.
    ///
    /// # Errors
    ///
    /// Returns `Transport` when no response arrives, `Status` for non-2xx
    /// responses (after forcing logout on 401), and `Decode` for a 2xx body
    /// that is not an envelope.
    pub async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiEnvelope<T>, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "http response");

        self.observe(status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status { status: status.as_u16(), body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn observe(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("received 401; forcing logout");
            self.session.logout();
        }
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::execute`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let builder = self.request(Method::GET, path);
        let builder = if query.is_empty() { builder } else { builder.query(query) };
        self.execute(builder).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::execute`].
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::execute`].
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    /// `PUT path` without a body; used for borrow state transitions.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::execute`].
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>, ClientError> {
        self.execute(self.request(Method::PUT, path)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::execute`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>, ClientError> {
        self.execute(self.request(Method::DELETE, path)).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

/// Unwrap a successful envelope's `data`.
///
/// # Errors
///
/// `Rejected` when `success` is false, `MissingData` when `data` is absent.
pub fn into_data<T>(envelope: ApiEnvelope<T>) -> Result<T, ClientError> {
    if !envelope.success {
        return Err(ClientError::Rejected { message: envelope.message });
    }
    envelope.data.ok_or(ClientError::MissingData)
}

/// Check a successful envelope whose `data` is irrelevant (deletes).
///
/// # Errors
///
/// `Rejected` when `success` is false.
pub fn into_unit<T>(envelope: ApiEnvelope<T>) -> Result<(), ClientError> {
    if envelope.success {
        Ok(())
    } else {
        Err(ClientError::Rejected { message: envelope.message })
    }
}
