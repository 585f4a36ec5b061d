//! Borrow lifecycle endpoints under `/api/borrows`.
//!
//! Approval, rejection and return are admin actions; the server enforces
//! which transitions are legal and the client just relays the verdict.

use crate::error::ClientError;
use crate::http::{HttpClient, into_data};
use crate::types::{Borrow, BorrowRequest, BorrowStatus, Page};

use super::PageRequest;

#[derive(Clone, Copy, Debug)]
pub struct BorrowsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> BorrowsApi<'a> {
    #[must_use]
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Submit a borrow request for the current user; it starts out `PENDING`.
    ///
    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn request(&self, book_id: i64, due_date: Option<&str>) -> Result<Borrow, ClientError> {
        let body = BorrowRequest { book_id, due_date: due_date.map(ToOwned::to_owned) };
        into_data(self.http.post("/api/borrows", &body).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn approve(&self, id: i64) -> Result<Borrow, ClientError> {
        into_data(self.http.put_empty(&format!("/api/borrows/{id}/approve")).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn reject(&self, id: i64) -> Result<Borrow, ClientError> {
        into_data(self.http.put_empty(&format!("/api/borrows/{id}/reject")).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn mark_returned(&self, id: i64) -> Result<Borrow, ClientError> {
        into_data(self.http.put_empty(&format!("/api/borrows/{id}/return")).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn get(&self, id: i64) -> Result<Borrow, ClientError> {
        into_data(self.http.get(&format!("/api/borrows/{id}"), &[]).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn list(&self, page: PageRequest) -> Result<Page<Borrow>, ClientError> {
        into_data(self.http.get("/api/borrows", &page.query()).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn by_user(&self, user_id: i64, page: PageRequest) -> Result<Page<Borrow>, ClientError> {
        into_data(self.http.get(&format!("/api/borrows/user/{user_id}"), &page.query()).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn by_book(&self, book_id: i64, page: PageRequest) -> Result<Page<Borrow>, ClientError> {
        into_data(self.http.get(&format!("/api/borrows/book/{book_id}"), &page.query()).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn by_status(&self, status: BorrowStatus, page: PageRequest) -> Result<Page<Borrow>, ClientError> {
        let path = format!("/api/borrows/status/{}", status.as_str());
        into_data(self.http.get(&path, &page.query()).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn overdue(&self) -> Result<Vec<Borrow>, ClientError> {
        into_data(self.http.get("/api/borrows/overdue", &[]).await?)
    }

    /// Approved borrows of the logged-in user.
    ///
    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn current(&self) -> Result<Vec<Borrow>, ClientError> {
        into_data(self.http.get("/api/borrows/current", &[]).await?)
    }
}
