//! Lifecycle manager — ownership-checked note mutations.
//!
//! State machine per note: Active ⇄ Archived (archive/unarchive, both
//! idempotent) → Deleted (terminal, represented by row absence). Ownership
//! is re-verified inside each storage statement, never as a separate
//! check before the write.

use std::sync::Arc;

use super::error::NoteError;
use crate::db::Database;
use crate::models::Note;

pub struct LifecycleManager {
    db: Arc<Database>,
}

impl LifecycleManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create an active note owned by `user_id`
    pub fn create(&self, user_id: i64, title: &str, text: &str) -> Result<Note, NoteError> {
        if title.trim().is_empty() {
            return Err(NoteError::EmptyTitle);
        }
        Ok(self.db.insert_note(user_id, title, text)?)
    }

    /// Full replace of title and text. Callers resend both fields; archive
    /// state and creation time are left untouched.
    pub fn edit(
        &self,
        user_id: i64,
        note_id: i64,
        title: &str,
        text: &str,
    ) -> Result<Option<Note>, NoteError> {
        if title.trim().is_empty() {
            return Err(NoteError::EmptyTitle);
        }
        Ok(self.db.update_note(user_id, note_id, title, text)?)
    }

    /// Archive a note. Archiving an already-archived note succeeds and
    /// returns it unchanged.
    pub fn archive(&self, user_id: i64, note_id: i64) -> Result<Option<Note>, NoteError> {
        Ok(self.db.set_note_archived(user_id, note_id, true)?)
    }

    /// Mirror of archive; idempotent as well
    pub fn unarchive(&self, user_id: i64, note_id: i64) -> Result<Option<Note>, NoteError> {
        Ok(self.db.set_note_archived(user_id, note_id, false)?)
    }

    /// Permanent removal, no recovery. `false` means nothing was deleted.
    pub fn delete(&self, user_id: i64, note_id: i64) -> Result<bool, NoteError> {
        Ok(self.db.delete_note(user_id, note_id)?)
    }

    /// Permanently remove every archived note owned by `user_id`; returns
    /// the number removed (0 is a valid result).
    pub fn delete_all_archived(&self, user_id: i64) -> Result<usize, NoteError> {
        Ok(self.db.delete_archived_notes(user_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::QueryEngine;

    fn engines() -> (QueryEngine, LifecycleManager) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.create_user("alice", "digest-a").unwrap();
        db.create_user("bob", "digest-b").unwrap();
        (QueryEngine::new(Arc::clone(&db)), LifecycleManager::new(db))
    }

    #[test]
    fn test_create_then_get_roundtrip() {
        let (query, lifecycle) = engines();

        let note = lifecycle.create(1, "Shopping List", "milk").unwrap();
        let fetched = query.get(1, note.id).unwrap().unwrap();

        assert_eq!(fetched.title, "Shopping List");
        assert_eq!(fetched.text, "milk");
        assert_eq!(fetched.owner_id, 1);
        assert!(!fetched.is_archived);
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let (_query, lifecycle) = engines();

        assert!(matches!(
            lifecycle.create(1, "", "body"),
            Err(NoteError::EmptyTitle)
        ));
        assert!(matches!(
            lifecycle.create(1, "   ", "body"),
            Err(NoteError::EmptyTitle)
        ));

        // Empty text is fine
        assert!(lifecycle.create(1, "title", "").is_ok());
    }

    #[test]
    fn test_edit_replaces_both_fields() {
        let (query, lifecycle) = engines();

        let note = lifecycle.create(1, "draft", "v1").unwrap();
        let edited = lifecycle.edit(1, note.id, "final", "v2").unwrap().unwrap();

        assert_eq!(edited.title, "final");
        assert_eq!(edited.text, "v2");
        assert_eq!(edited.created_at, note.created_at);

        let fetched = query.get(1, note.id).unwrap().unwrap();
        assert_eq!(fetched.text, "v2");
    }

    #[test]
    fn test_edit_rejects_empty_title() {
        let (_query, lifecycle) = engines();

        let note = lifecycle.create(1, "keep me", "body").unwrap();
        assert!(matches!(
            lifecycle.edit(1, note.id, "", "body"),
            Err(NoteError::EmptyTitle)
        ));
    }

    #[test]
    fn test_edit_does_not_unarchive() {
        let (query, lifecycle) = engines();

        let note = lifecycle.create(1, "note", "").unwrap();
        lifecycle.archive(1, note.id).unwrap();
        lifecycle.edit(1, note.id, "renamed", "").unwrap();

        assert!(query.get(1, note.id).unwrap().unwrap().is_archived);
    }

    #[test]
    fn test_archive_unarchive_roundtrip() {
        let (query, lifecycle) = engines();

        let note = lifecycle.create(1, "cycle", "body").unwrap();

        let archived = lifecycle.archive(1, note.id).unwrap().unwrap();
        assert!(archived.is_archived);

        let restored = lifecycle.unarchive(1, note.id).unwrap().unwrap();
        assert!(!restored.is_archived);
        assert_eq!(restored.title, note.title);
        assert_eq!(restored.text, note.text);
        assert_eq!(restored.created_at, note.created_at);

        let fetched = query.get(1, note.id).unwrap().unwrap();
        assert!(!fetched.is_archived);
    }

    #[test]
    fn test_archive_is_idempotent() {
        let (_query, lifecycle) = engines();

        let note = lifecycle.create(1, "twice", "").unwrap();
        lifecycle.archive(1, note.id).unwrap().unwrap();
        let again = lifecycle.archive(1, note.id).unwrap().unwrap();
        assert!(again.is_archived);

        lifecycle.unarchive(1, note.id).unwrap().unwrap();
        let again = lifecycle.unarchive(1, note.id).unwrap().unwrap();
        assert!(!again.is_archived);
    }

    #[test]
    fn test_mutations_never_cross_owners() {
        let (query, lifecycle) = engines();

        let note = lifecycle.create(1, "alice's", "secret").unwrap();

        assert!(lifecycle.edit(2, note.id, "bob's", "").unwrap().is_none());
        assert!(lifecycle.archive(2, note.id).unwrap().is_none());
        assert!(lifecycle.unarchive(2, note.id).unwrap().is_none());
        assert!(!lifecycle.delete(2, note.id).unwrap());

        let fetched = query.get(1, note.id).unwrap().unwrap();
        assert_eq!(fetched.title, "alice's");
        assert_eq!(fetched.text, "secret");
        assert!(!fetched.is_archived);
    }

    #[test]
    fn test_delete_is_terminal() {
        let (query, lifecycle) = engines();

        let note = lifecycle.create(1, "gone", "").unwrap();
        assert!(lifecycle.delete(1, note.id).unwrap());
        assert!(query.get(1, note.id).unwrap().is_none());
        assert!(lifecycle.archive(1, note.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_nonexistent_is_not_found() {
        let (_query, lifecycle) = engines();
        assert!(!lifecycle.delete(1, 424242).unwrap());
    }

    #[test]
    fn test_delete_all_archived_counts_and_spares_active() {
        let (query, lifecycle) = engines();

        for i in 0..3 {
            let note = lifecycle.create(1, &format!("archived {i}"), "").unwrap();
            lifecycle.archive(1, note.id).unwrap();
        }
        lifecycle.create(1, "active 1", "").unwrap();
        lifecycle.create(1, "active 2", "").unwrap();

        // Bob's archived note must not be touched
        let bobs = lifecycle.create(2, "bob archived", "").unwrap();
        lifecycle.archive(2, bobs.id).unwrap();

        assert_eq!(lifecycle.delete_all_archived(1).unwrap(), 3);
        assert_eq!(lifecycle.delete_all_archived(1).unwrap(), 0);

        let remaining = query
            .list(
                1,
                &crate::notes::FilterRequest {
                    age: Some("alltime".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(remaining.data.len(), 2);

        assert!(query.get(2, bobs.id).unwrap().is_some());
    }
}
