//! Item table operations (insert, substring search, tag lookup, delete, export dump)

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::super::Database;
use crate::models::{Item, NewItem};

/// Title is capped at 500 characters at write time, description at 2000.
/// Oversized values are truncated, never rejected.
const MAX_TITLE_CHARS: usize = 500;
const MAX_DESCRIPTION_CHARS: usize = 2000;

const ITEM_COLUMNS: &str =
    "id, url, title, description, tags, added_by, added_at, file_id, file_name, file_type";

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl Database {
    /// Insert an item and return its assigned id. No uniqueness is enforced;
    /// exact duplicates are permitted and accumulate.
    pub fn insert_item(&self, item: NewItem) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO items (url, title, description, tags, added_by, added_at, file_id, file_name, file_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                item.url,
                truncate_chars(&item.title, MAX_TITLE_CHARS),
                truncate_chars(&item.description, MAX_DESCRIPTION_CHARS),
                item.tags.trim(),
                item.added_by,
                &now,
                item.file_id,
                item.file_name,
                item.file_type,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Case-insensitive substring search across url, title, description, tags
    /// and file_name. `files_only` restricts results to items carrying a
    /// file_id. Most recent first. An empty query matches everything, so
    /// callers should screen for that themselves.
    pub fn search_items(
        &self,
        query: &str,
        files_only: bool,
        limit: i64,
        offset: i64,
    ) -> SqliteResult<Vec<Item>> {
        let conn = self.conn.lock().unwrap();
        let like = format!("%{}%", query.to_lowercase());

        let sql = if files_only {
            format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE file_id IS NOT NULL
                   AND (
                       lower(coalesce(url,'')) LIKE ?1
                    OR lower(coalesce(title,'')) LIKE ?1
                    OR lower(coalesce(description,'')) LIKE ?1
                    OR lower(coalesce(tags,'')) LIKE ?1
                    OR lower(coalesce(file_name,'')) LIKE ?1
                   )
                 ORDER BY id DESC
                 LIMIT ?2 OFFSET ?3"
            )
        } else {
            format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE (
                       lower(coalesce(url,'')) LIKE ?1
                    OR lower(coalesce(title,'')) LIKE ?1
                    OR lower(coalesce(description,'')) LIKE ?1
                    OR lower(coalesce(tags,'')) LIKE ?1
                    OR lower(coalesce(file_name,'')) LIKE ?1
                 )
                 ORDER BY id DESC
                 LIMIT ?2 OFFSET ?3"
            )
        };

        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(rusqlite::params![like, limit, offset], Self::row_to_item)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(items)
    }

    /// All items, most recent first.
    pub fn recent_items(&self, limit: i64) -> SqliteResult<Vec<Item>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id DESC LIMIT ?1"
        ))?;
        let items = stmt
            .query_map([limit], Self::row_to_item)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    /// Items whose tags field contains `#<tag>` as a literal substring
    /// (case-insensitive). Substring semantics: a lookup for "ops" also
    /// matches "#opsroom".
    pub fn items_by_tag(&self, tag: &str, limit: i64, offset: i64) -> SqliteResult<Vec<Item>> {
        let conn = self.conn.lock().unwrap();
        let like = format!("%#{}%", tag.to_lowercase());
        let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items
             WHERE lower(coalesce(tags,'')) LIKE ?1
             ORDER BY id DESC
             LIMIT ?2 OFFSET ?3"
        ))?;
        let items = stmt
            .query_map(rusqlite::params![like, limit, offset], Self::row_to_item)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    pub fn get_item(&self, id: i64) -> SqliteResult<Option<Item>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
            [id],
            Self::row_to_item,
        )
        .optional()
    }

    /// Delete one item. Returns whether a row was actually removed.
    pub fn delete_item(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM items WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    /// Every item in insertion order, for CSV export.
    pub fn all_items(&self) -> SqliteResult<Vec<Item>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id ASC"
        ))?;
        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
        let added_at_str: String = row.get(6)?;

        Ok(Item {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            tags: row.get(4)?,
            added_by: row.get(5)?,
            added_at: DateTime::parse_from_rfc3339(&added_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default(),
            file_id: row.get(7)?,
            file_name: row.get(8)?,
            file_type: row.get(9)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.sqlite3");
        let db = Database::open(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    fn link_item(url: &str, title: &str, tags: &str) -> NewItem {
        NewItem {
            url: Some(url.to_string()),
            title: title.to_string(),
            tags: tags.to_string(),
            added_by: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let (_dir, db) = test_db();
        let a = db.insert_item(link_item("https://a.example", "a", "")).unwrap();
        let b = db.insert_item(link_item("https://b.example", "b", "")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_insert_truncates_and_trims() {
        let (_dir, db) = test_db();
        let id = db
            .insert_item(NewItem {
                title: "t".repeat(600),
                description: "d".repeat(3000),
                tags: "  #one #two  ".to_string(),
                added_by: Some(7),
                ..Default::default()
            })
            .unwrap();
        let item = db.get_item(id).unwrap().unwrap();
        assert_eq!(item.title.chars().count(), 500);
        assert_eq!(item.description.chars().count(), 2000);
        assert_eq!(item.tags, "#one #two");
    }

    #[test]
    fn test_search_matches_any_field_case_insensitive() {
        let (_dir, db) = test_db();
        let id = db
            .insert_item(NewItem {
                url: Some("https://foo.bar/page".to_string()),
                title: "Quarterly Report".to_string(),
                description: "numbers and charts".to_string(),
                tags: "#Finance".to_string(),
                added_by: Some(1),
                ..Default::default()
            })
            .unwrap();

        for q in ["foo.bar", "quarterly", "CHARTS", "finance"] {
            let hits = db.search_items(q, false, 10, 0).unwrap();
            assert!(hits.iter().any(|i| i.id == id), "query {q:?} missed item");
        }
        assert!(db.search_items("nosuchthing", false, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_files_only() {
        let (_dir, db) = test_db();
        db.insert_item(link_item("https://policy.example/doc", "policy link", ""))
            .unwrap();
        let file_id = db
            .insert_item(NewItem {
                title: "policy handbook".to_string(),
                file_id: Some("BAADBAAD".to_string()),
                file_name: Some("handbook.pdf".to_string()),
                file_type: Some("application/pdf".to_string()),
                added_by: Some(1),
                ..Default::default()
            })
            .unwrap();

        let hits = db.search_items("policy", true, 10, 0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, file_id);

        // file_name participates in the plain search too
        let hits = db.search_items("handbook.pdf", false, 10, 0).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_search_orders_most_recent_first() {
        let (_dir, db) = test_db();
        let first = db.insert_item(link_item("https://x.example/1", "both", "")).unwrap();
        let second = db.insert_item(link_item("https://x.example/2", "both", "")).unwrap();
        let hits = db.search_items("both", false, 10, 0).unwrap();
        assert_eq!(hits[0].id, second);
        assert_eq!(hits[1].id, first);
    }

    #[test]
    fn test_search_pagination_pages_are_disjoint() {
        let (_dir, db) = test_db();
        for n in 0..12 {
            db.insert_item(link_item(&format!("https://p.example/{n}"), "paged", ""))
                .unwrap();
        }
        let page0: Vec<i64> = db
            .search_items("paged", false, 5, 0)
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        let page1: Vec<i64> = db
            .search_items("paged", false, 5, 5)
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(page0.len(), 5);
        assert_eq!(page1.len(), 5);
        assert!(page0.iter().all(|id| !page1.contains(id)));
    }

    #[test]
    fn test_items_by_tag_is_substring_match() {
        let (_dir, db) = test_db();
        let exact = db.insert_item(link_item("https://a.example", "a", "#ops")).unwrap();
        let superset = db
            .insert_item(link_item("https://b.example", "b", "#opsroom"))
            .unwrap();
        db.insert_item(link_item("https://c.example", "c", "#dev")).unwrap();

        let ids: Vec<i64> = db
            .items_by_tag("ops", 10, 0)
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert!(ids.contains(&exact));
        assert!(ids.contains(&superset));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, db) = test_db();
        let id = db.insert_item(link_item("https://gone.example", "gone", "")).unwrap();
        assert!(db.delete_item(id).unwrap());
        assert!(!db.delete_item(id).unwrap());
        assert!(!db.delete_item(99999).unwrap());
        assert!(db.get_item(id).unwrap().is_none());
    }

    #[test]
    fn test_all_items_in_insertion_order() {
        let (_dir, db) = test_db();
        let a = db.insert_item(link_item("https://1.example", "1", "")).unwrap();
        let b = db.insert_item(link_item("https://2.example", "2", "")).unwrap();
        let all = db.all_items().unwrap();
        assert_eq!(all.iter().map(|i| i.id).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_duplicate_inserts_accumulate() {
        let (_dir, db) = test_db();
        db.insert_item(link_item("https://dup.example", "dup", "")).unwrap();
        db.insert_item(link_item("https://dup.example", "dup", "")).unwrap();
        assert_eq!(db.search_items("dup.example", false, 10, 0).unwrap().len(), 2);
    }
}
