//! SQLite EntryRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::db::{DbResult, Entry, EntryRepository, NewEntry};

/// SQLx-backed entry repository.
pub struct SqliteEntryRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn entry_from_row(row: &SqliteRow) -> DbResult<Entry> {
    Ok(Entry {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        category: row.try_get("category")?,
    })
}

impl EntryRepository for SqliteEntryRepository<'_> {
    async fn list(&self) -> DbResult<Vec<Entry>> {
        let rows = sqlx::query("SELECT id, title, text, category FROM entries ORDER BY id DESC")
            .fetch_all(self.pool)
            .await?;

        debug!(count = rows.len(), "listed entries");
        rows.iter().map(entry_from_row).collect()
    }

    async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT category FROM entries GROUP BY category ORDER BY MAX(id) DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    async fn list_by_category(&self, category: &str) -> DbResult<Vec<Entry>> {
        let rows = sqlx::query(
            "SELECT id, title, text, category FROM entries WHERE category = ? ORDER BY id DESC",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        debug!(category, count = rows.len(), "listed entries by category");
        rows.iter().map(entry_from_row).collect()
    }

    async fn create(&self, entry: &NewEntry) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO entries (title, text, category) VALUES (?, ?, ?)")
            .bind(&entry.title)
            .bind(&entry.text)
            .bind(&entry.category)
            .execute(self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> DbResult<Option<Entry>> {
        let row = sqlx::query("SELECT id, title, text, category FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn update(&self, id: i64, entry: &NewEntry) -> DbResult<bool> {
        let result =
            sqlx::query("UPDATE entries SET title = ?, text = ?, category = ? WHERE id = ?")
                .bind(&entry.title)
                .bind(&entry.text)
                .bind(&entry.category)
                .bind(id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
