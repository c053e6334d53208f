//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing request handling.
//! Futures are declared `Send` so handlers generic over `Database` can be
//! served by axum.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Entry, NewEntry},
};

/// Repository for Entry operations.
pub trait EntryRepository {
    /// Get all entries, newest (highest id) first.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Entry>>> + Send;

    /// Get the distinct categories, most recently used first.
    fn categories(&self) -> impl Future<Output = DbResult<Vec<String>>> + Send;

    /// Get entries whose category exactly matches `category`, newest first.
    fn list_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = DbResult<Vec<Entry>>> + Send;

    /// Insert an entry and return its new id.
    fn create(&self, entry: &NewEntry) -> impl Future<Output = DbResult<i64>> + Send;

    /// Get an entry by id.
    fn get(&self, id: i64) -> impl Future<Output = DbResult<Option<Entry>>> + Send;

    /// Overwrite title, text and category of an entry.
    ///
    /// Returns `false` when no entry has this id; that is not an error.
    fn update(&self, id: i64, entry: &NewEntry) -> impl Future<Output = DbResult<bool>> + Send;

    /// Delete an entry by id.
    ///
    /// Returns `false` when no entry has this id; that is not an error.
    fn delete(&self, id: i64) -> impl Future<Output = DbResult<bool>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync {
    type Entries<'a>: EntryRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the entry repository.
    fn entries(&self) -> Self::Entries<'_>;
}
