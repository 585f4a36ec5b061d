//! Book catalogue endpoints under `/api/books`.

use crate::error::ClientError;
use crate::http::{HttpClient, into_data, into_unit};
use crate::types::{Book, BookRequest, Page};

use super::{PageRequest, path_segment};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort order for the full listing; the backend defaults to `id asc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookSort {
    pub sort_by: String,
    pub direction: SortDirection,
}

impl Default for BookSort {
    fn default() -> Self {
        Self { sort_by: "id".to_owned(), direction: SortDirection::Asc }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BooksApi<'a> {
    http: &'a HttpClient,
}

impl<'a> BooksApi<'a> {
    #[must_use]
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn list(&self, page: PageRequest, sort: &BookSort) -> Result<Page<Book>, ClientError> {
        let mut query = page.query();
        query.push(("sortBy", sort.sort_by.clone()));
        query.push(("direction", sort.direction.as_str().to_owned()));
        into_data(self.http.get("/api/books", &query).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn search(&self, keyword: &str, page: PageRequest) -> Result<Page<Book>, ClientError> {
        let mut query = vec![("keyword", keyword.to_owned())];
        query.extend(page.query());
        into_data(self.http.get("/api/books/search", &query).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn by_category(&self, category: &str, page: PageRequest) -> Result<Page<Book>, ClientError> {
        let path = format!("/api/books/category/{}", path_segment(category));
        into_data(self.http.get(&path, &page.query()).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn by_author(&self, author: &str, page: PageRequest) -> Result<Page<Book>, ClientError> {
        let path = format!("/api/books/author/{}", path_segment(author));
        into_data(self.http.get(&path, &page.query()).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn available(&self) -> Result<Vec<Book>, ClientError> {
        into_data(self.http.get("/api/books/available", &[]).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn get(&self, id: i64) -> Result<Book, ClientError> {
        into_data(self.http.get(&format!("/api/books/{id}"), &[]).await?)
    }

    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn by_isbn(&self, isbn: &str) -> Result<Book, ClientError> {
        into_data(self.http.get(&format!("/api/books/isbn/{}", path_segment(isbn)), &[]).await?)
    }

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn add(&self, book: &BookRequest) -> Result<Book, ClientError> {
        into_data(self.http.post("/api/books", book).await?)
    }

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn update(&self, id: i64, book: &BookRequest) -> Result<Book, ClientError> {
        into_data(self.http.put(&format!("/api/books/{id}"), book).await?)
    }

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Any transport, status or envelope failure.
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        into_unit(self.http.delete::<serde_json::Value>(&format!("/api/books/{id}")).await?)
    }
}
