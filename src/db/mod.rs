//! Entry storage layer.
//!
//! Handlers only see the traits in `repository`, so the storage backend can
//! be swapped without touching request handling.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Entry, NewEntry)
//! - `repository`: Trait definitions for data access
//! - `sqlite`: SQLx-backed SQLite implementation

mod error;
mod models;
mod repository;
pub mod sqlite;


pub use error::{DbError, DbResult};
pub use models::*;
pub use repository::*;
pub use sqlite::SqliteDatabase;
