pub mod tables;

use std::sync::Mutex;

use rusqlite::{Connection, Result as SqliteResult};

/// SQLite-backed item store. One connection guarded by a mutex; every
/// operation is a single statement, so there is no cross-call transaction
/// state to protect.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &str) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS items (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              url TEXT,
              title TEXT,
              description TEXT,
              tags TEXT,
              added_by INTEGER,
              added_at TEXT,
              file_id TEXT,
              file_name TEXT,
              file_type TEXT
            )",
            [],
        )?;
        Ok(())
    }
}
