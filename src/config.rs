//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const SESSION_DIR_NAME: &str = "library-client";
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash.
    pub base_url: String,
    /// Location of the durable key-value file backing the session mirror.
    pub session_file: PathBuf,
    /// Re-validate a stored token against `/api/auth/check` during bootstrap.
    pub check_on_startup: bool,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LIBRARY_API_BASE_URL`: default `http://localhost:8080`
    /// - `LIBRARY_SESSION_FILE`: default `<data dir>/library-client/session.json`
    /// - `LIBRARY_CHECK_ON_STARTUP`: default true
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = normalize_base_url(
            &std::env::var("LIBRARY_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        );
        let session_file = std::env::var_os("LIBRARY_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_file);
        let check_on_startup = env_bool("LIBRARY_CHECK_ON_STARTUP").unwrap_or(true);

        Self { base_url, session_file, check_on_startup }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            session_file: default_session_file(),
            check_on_startup: true,
        }
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn default_session_file() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push(SESSION_DIR_NAME);
    path.push(SESSION_FILE_NAME);
    path
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
