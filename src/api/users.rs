//! User administration endpoints under `/api/users`.

use crate::error::ClientError;
use crate::http::{HttpClient, into_data, into_unit};
use crate::types::{RegisterRequest, UserRecord};

#[derive(Clone, Copy, Debug)]
pub struct UsersApi<'a> {
    http: &'a HttpClient,
}

impl<'a> UsersApi<'a> {
    #[must_use]
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn list(&self) -> Result<Vec<UserRecord>, ClientError> {
        into_data(self.http.get("/api/users", &[]).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn get(&self, id: i64) -> Result<UserRecord, ClientError> {
        into_data(self.http.get(&format!("/api/users/{id}"), &[]).await?)
    }

    /// The backend reuses the registration shape for profile updates.
    ///
    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn update(&self, id: i64, user: &RegisterRequest) -> Result<UserRecord, ClientError> {
        into_data(self.http.put(&format!("/api/users/{id}"), user).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        into_unit(self.http.delete::<serde_json::Value>(&format!("/api/users/{id}")).await?)
    }
}
