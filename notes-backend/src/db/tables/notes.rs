//! Note table operations.
//!
//! Every statement carries the `user_id` predicate inside the SQL itself,
//! so ownership is re-verified at the storage layer on each write rather
//! than checked separately from it.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Result as SqliteResult, Row};

use super::super::Database;
use crate::models::Note;
use crate::notes::CompiledQuery;

const NOTE_COLUMNS: &str = "id, user_id, title, text, created_at, is_archive";

fn note_from_row(row: &Row) -> rusqlite::Result<Note> {
    let created_at_str: String = row.get(4)?;

    Ok(Note {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        text: row.get(3)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .unwrap()
            .with_timezone(&Utc),
        is_archived: row.get(5)?,
    })
}

/// Escape LIKE metacharacters so a search term matches as a literal substring
pub(crate) fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Database {
    /// Insert a new active note owned by `user_id`
    pub fn insert_note(&self, user_id: i64, title: &str, text: &str) -> SqliteResult<Note> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO notes (user_id, title, text, created_at, is_archive)
             VALUES (?1, ?2, ?3, ?4, 0)",
            rusqlite::params![user_id, title, text, created_at.to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            owner_id: user_id,
            title: title.to_string(),
            text: text.to_string(),
            created_at,
            is_archived: false,
        })
    }

    /// Fetch a single note scoped by owner. A note that exists but belongs
    /// to another user is indistinguishable from an absent one.
    pub fn get_note(&self, user_id: i64, note_id: i64) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1 AND user_id = ?2"
        ))?;

        stmt.query_row(rusqlite::params![note_id, user_id], note_from_row)
            .optional()
    }

    /// List one page of notes matching a compiled query.
    ///
    /// The owner scope is bound first and unconditionally; the compiled
    /// predicates only ever narrow it further. Ordering is newest-first
    /// with id as tiebreaker so pages stay stable across requests.
    pub fn list_notes(&self, user_id: i64, query: &CompiledQuery) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ?1");
        let mut params: Vec<Value> = vec![Value::Integer(user_id)];

        if let Some(archived) = query.archived {
            params.push(Value::Integer(archived as i64));
            sql.push_str(&format!(" AND is_archive = ?{}", params.len()));
        }
        if let Some(cutoff) = query.created_after {
            params.push(Value::Text(cutoff.to_rfc3339()));
            sql.push_str(&format!(" AND created_at >= ?{}", params.len()));
        }
        if let Some(term) = &query.title_substring {
            // SQLite LIKE is case-insensitive for ASCII
            params.push(Value::Text(format!("%{}%", escape_like(term))));
            sql.push_str(&format!(" AND title LIKE ?{} ESCAPE '\\'", params.len()));
        }

        params.push(Value::Integer(query.limit));
        sql.push_str(&format!(
            " ORDER BY created_at DESC, id DESC LIMIT ?{}",
            params.len()
        ));
        params.push(Value::Integer(query.offset));
        sql.push_str(&format!(" OFFSET ?{}", params.len()));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), note_from_row)?;
        rows.collect()
    }

    /// Replace title and text. Archive state and creation time are untouched.
    pub fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        title: &str,
        text: &str,
    ) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let changed = conn.execute(
            "UPDATE notes SET title = ?1, text = ?2 WHERE id = ?3 AND user_id = ?4",
            rusqlite::params![title, text, note_id, user_id],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        self.get_note(user_id, note_id)
    }

    /// Set the archive flag. Idempotent: setting the current value again
    /// succeeds and returns the note unchanged.
    pub fn set_note_archived(
        &self,
        user_id: i64,
        note_id: i64,
        archived: bool,
    ) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let changed = conn.execute(
            "UPDATE notes SET is_archive = ?1 WHERE id = ?2 AND user_id = ?3",
            rusqlite::params![archived, note_id, user_id],
        )?;
        drop(conn);

        if changed == 0 {
            return Ok(None);
        }
        self.get_note(user_id, note_id)
    }

    /// Permanently delete one note. Returns whether a row was removed.
    pub fn delete_note(&self, user_id: i64, note_id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let deleted = conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![note_id, user_id],
        )?;

        Ok(deleted > 0)
    }

    /// Permanently delete every archived note owned by `user_id` in one
    /// statement, so the bulk removal cannot partially apply. Returns the
    /// number of notes removed.
    pub fn delete_archived_notes(&self, user_id: i64) -> SqliteResult<usize> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "DELETE FROM notes WHERE user_id = ?1 AND is_archive = 1",
            [user_id],
        )
    }
}
