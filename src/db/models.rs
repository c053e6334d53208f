//! Domain models.
//!
//! Entities are plain data; they carry no storage concerns.

/// A persisted blog entry.
///
/// `id` is assigned by the store on insert and never changes afterwards.
/// `text` is stored and rendered as raw markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub category: String,
}

/// The user-supplied fields of an entry.
///
/// Inserts and updates always carry all three together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub text: String,
    pub category: String,
}

impl NewEntry {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            category: category.into(),
        }
    }
}

#[cfg(test)]
impl NewEntry {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> Entry {
        Entry {
            id,
            title: self.title,
            text: self.text,
            category: self.category,
        }
    }
}
