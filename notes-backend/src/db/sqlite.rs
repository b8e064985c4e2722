//! SQLite database handle and schema initialization.
//!
//! One `Database` instance is shared across all request handlers behind an
//! `Arc`; the inner `Mutex<Connection>` serializes store access. Table
//! operations live in `db/tables/*` as separate `impl Database` blocks.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file at `db_path` and initialize the schema
    pub fn new(db_path: &str) -> SqliteResult<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, used as the store double in tests
    pub fn open_in_memory() -> SqliteResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        // Bound suspension on a locked database instead of hanging
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_tables()?;
        Ok(db)
    }

    fn init_tables(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS auth_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token TEXT NOT NULL UNIQUE,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                title TEXT NOT NULL CHECK (length(title) > 0),
                text TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                is_archive INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_notes_user_created
                ON notes (user_id, created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_auth_sessions_token
                ON auth_sessions (token);",
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir
            .path()
            .join(".db")
            .join("notes.db")
            .to_string_lossy()
            .to_string();

        let note_id = {
            let db = Database::new(&db_path).unwrap();
            db.create_user("alice", "digest").unwrap();
            db.insert_note(1, "persisted", "body").unwrap().id
        };

        // Reopening finds the same data; init_tables is a no-op on an
        // existing schema
        let db = Database::new(&db_path).unwrap();
        let note = db.get_note(1, note_id).unwrap().unwrap();
        assert_eq!(note.title, "persisted");
    }
}
