//! Session client for the library management backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend speaks JSON over REST and authenticates with bearer tokens.
//! This crate holds the client side of that contract: who is logged in, how
//! that belief is persisted between runs, how every request is authorized,
//! and which destinations a session may navigate to.
//!
//! - `session`: shared in-memory session plus its durable mirror
//! - `auth`: login, register, logout, init and token re-validation
//! - `http`: the one HTTP client, with bearer and 401 interceptors
//! - `router` / `guard`: route table and the navigation gate
//! - `api`: typed wrappers for books, borrows, users and admin stats
//! - `app`: the context object wiring all of the above
//!
//! ```no_run
//! use library_client::{App, ClientConfig};
//!
//! # async fn run() -> Result<(), library_client::ClientError> {
//! let app = App::from_config(ClientConfig::from_env())?;
//! app.bootstrap().await;
//! if app.store().login("alice", "secret").await.is_success() {
//!     let current = app.borrows().current().await?;
//!     println!("{} active borrows", current.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod navigation;
pub mod router;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{App, Navigation};
pub use auth::{LoginOutcome, SessionStore};
pub use config::ClientConfig;
pub use error::{ClientError, StorageError};
pub use guard::{GuardDecision, RouteGuard};
pub use http::HttpClient;
pub use navigation::{History, Navigator};
pub use router::{Route, RouteMatch, RouteMeta, RouteTable};
pub use session::{Session, SessionContext};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
