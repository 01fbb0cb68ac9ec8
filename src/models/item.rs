use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored knowledge item: a saved link, an indexed file, or a plain note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub url: Option<String>,
    pub title: String,
    pub description: String,
    /// Whitespace-separated `#tokens`, original casing preserved.
    pub tags: String,
    pub added_by: Option<i64>,
    pub added_at: DateTime<Utc>,
    /// Opaque Telegram file handle, set only for file items.
    pub file_id: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

impl Item {
    pub fn is_file(&self) -> bool {
        self.file_id.is_some()
    }

    pub fn is_image(&self) -> bool {
        self.file_type
            .as_deref()
            .is_some_and(|t| t.starts_with("image/"))
    }
}

/// Fields for inserting a new item. `id` and `added_at` are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub url: Option<String>,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub added_by: Option<i64>,
    pub file_id: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}
