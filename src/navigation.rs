//! Navigation side effects.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session's logout and the route guard's redirects both "move the user
//! somewhere". They go through `Navigator` so the front-end decides what a
//! location change means (re-render, print, record).

use std::sync::{Mutex, PoisonError};

pub trait Navigator: Send + Sync {
    /// Move to `path`. Must not fail.
    fn navigate(&self, path: &str);
}

/// Navigator that records every location it is sent to.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self { entries: Mutex::new(vec![initial.to_owned()]) }
    }

    /// Most recent location.
    #[must_use]
    pub fn current(&self) -> String {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.last().cloned().unwrap_or_default()
    }

    /// Every location visited, oldest first, including the initial one.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// How many times `path` was navigated to after construction.
    #[must_use]
    pub fn visits(&self, path: &str) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().skip(1).filter(|entry| *entry == path).count()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str) {
        tracing::debug!(%path, "navigate");
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_owned());
    }
}
