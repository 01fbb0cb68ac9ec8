//! Inline picker: free-text query with an optional `files:` prefix; an empty
//! query shows the most recent items.

use rusqlite::Result as SqliteResult;

use crate::db::Database;
use crate::format;
use crate::models::Item;
use crate::telegram::types::{InlineQuery, InlineQueryResult};
use crate::App;

const INLINE_PAGE: i64 = 25;
const MAX_INLINE_RESULTS: usize = 50;

/// Strip a leading `files:` marker (ASCII-case-insensitive) from a picker
/// query. Returns whether the marker was present and the remaining query,
/// both sides trimmed.
fn split_files_prefix(query: &str) -> (bool, &str) {
    let q = query.trim();
    if q.is_char_boundary(6) && q[..6].eq_ignore_ascii_case("files:") {
        (true, q[6..].trim())
    } else {
        (false, q)
    }
}

/// Non-empty queries hit the substring search; an empty query lists recent
/// items, filtered to file items when `files_only` is set.
fn picker_items(db: &Database, q: &str, files_only: bool) -> SqliteResult<Vec<Item>> {
    if !q.is_empty() {
        return db.search_items(q, files_only, INLINE_PAGE, 0);
    }
    db.recent_items(INLINE_PAGE).map(|items| {
        if files_only {
            items.into_iter().filter(|i| i.is_file()).collect()
        } else {
            items
        }
    })
}

pub async fn handle_inline_query(app: &App, query: &InlineQuery) -> Result<(), String> {
    let (files_only, q) = split_files_prefix(&query.query);

    let items = picker_items(&app.db, q, files_only)
        .map_err(|e| format!("inline search failed: {}", e))?;

    let mut results: Vec<InlineQueryResult> = items.iter().map(format::inline_result).collect();
    results.truncate(MAX_INLINE_RESULTS);

    app.bot.answer_inline_query(&query.id, &results).await
}
