//! Error types for the library client.
//!
//! ERROR HANDLING
//! ==============
//! REST wrappers return `ClientError` so callers can tell a dead network
//! apart from a server-side rejection. The session lifecycle collapses all of
//! these into boolean outcomes before they reach the front-end.

use std::path::PathBuf;

use crate::types::ApiEnvelope;

/// Errors from the durable key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry map could not be encoded.
    #[error("storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors produced by HTTP client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was received (connect failure, broken connection, bad URL).
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned HTTP {status}")]
    Status { status: u16, body: String },

    /// A 2xx body was not a valid API envelope.
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope carried `success: false`.
    #[error("server reported failure: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// The envelope reported success but carried no `data`.
    #[error("response is missing `data`")]
    MissingData,

    /// The configured base URL cannot be used.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// HTTP status code, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for 401 and 403 responses.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// The server's `message`, if the failure carried a well-formed envelope.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Rejected { message } => message.clone(),
            Self::Status { body, .. } => serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
                .ok()
                .and_then(|envelope| envelope.message),
            _ => None,
        }
    }

    /// True when the body of a non-2xx response is an envelope with `success: false`.
    #[must_use]
    pub fn is_server_rejection(&self) -> bool {
        match self {
            Self::Rejected { .. } => true,
            Self::Status { body, .. } => serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
                .is_ok_and(|envelope| !envelope.success),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
