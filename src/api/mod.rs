//! REST wrappers over the library backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Thin pass-through calls: each method maps to one endpoint, sends through
//! the shared `HttpClient` (so the auth interceptors apply) and unwraps the
//! envelope's `data`. No retry, batching or transformation happens here.

use std::fmt::Write;

pub mod admin;
pub mod books;
pub mod borrows;
pub mod users;


pub use admin::AdminApi;
pub use books::BooksApi;
pub use borrows::BorrowsApi;
pub use users::UsersApi;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Zero-based page selector sent as `page` / `size` query parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub(crate) fn query(self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("size", self.size.to_string())]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: DEFAULT_PAGE_SIZE }
    }
}

/// Percent-encode a value used as a single path segment.
pub(crate) fn path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}
