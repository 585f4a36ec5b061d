//! Admin dashboard endpoints under `/api/admin`.

use crate::error::ClientError;
use crate::http::{HttpClient, into_data};
use crate::types::{AdminStats, Borrow};

#[derive(Clone, Copy, Debug)]
pub struct AdminApi<'a> {
    http: &'a HttpClient,
}

impl<'a> AdminApi<'a> {
    #[must_use]
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn stats(&self) -> Result<AdminStats, ClientError> {
        into_data(self.http.get("/api/admin/stats", &[]).await?)
    }

    /// Most recent borrow records for the dashboard feed.
    ///
    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn recent_borrows(&self) -> Result<Vec<Borrow>, ClientError> {
        into_data(self.http.get("/api/admin/borrows/recent", &[]).await?)
    }
}
