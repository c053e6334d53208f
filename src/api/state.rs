//! Application state for the server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::db::Database;

/// Shared application state.
///
/// Generic over `D: Database`, so tests run the same handlers against an
/// in-memory database. Dependencies are injected via constructor.
pub struct AppState<D: Database> {
    db: Arc<D>,
    key: Key,
}

// Manual Clone impl - only the Arc is cloned, D itself need not be Clone
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            key: self.key.clone(),
        }
    }
}

impl<D: Database> AppState<D> {
    /// Create a new AppState from a database and the flash cookie signing key.
    pub fn new(db: D, key: Key) -> Self {
        Self {
            db: Arc::new(db),
            key,
        }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }
}

// Lets `SignedCookieJar` find its key in the router state.
impl<D: Database> FromRef<AppState<D>> for Key {
    fn from_ref(state: &AppState<D>) -> Self {
        state.key.clone()
    }
}
