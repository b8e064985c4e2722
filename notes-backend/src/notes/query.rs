//! Read side of the note engine.

use std::sync::Arc;

use chrono::Utc;

use super::error::NoteError;
use super::filter::{FilterRequest, PAGE_SIZE};
use crate::db::Database;
use crate::models::{Note, NotePage};

/// Executes compiled filter requests against the store, always scoped by
/// the calling user's identity.
pub struct QueryEngine {
    db: Arc<Database>,
}

impl QueryEngine {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Run one filter request and return a single result page.
    ///
    /// `has_more` compares the returned row count against the page size;
    /// when the last page is exactly full this reports `true` even though
    /// the following page is empty. Kept as-is from the original service.
    pub fn list(&self, user_id: i64, request: &FilterRequest) -> Result<NotePage, NoteError> {
        let query = request.compile(Utc::now());
        let data = self.db.list_notes(user_id, &query)?;
        let has_more = data.len() as i64 == PAGE_SIZE;

        Ok(NotePage { data, has_more })
    }

    /// Single-row fetch scoped by owner. A note belonging to another user
    /// yields `None`, indistinguishable from an absent one.
    pub fn get(&self, user_id: i64, note_id: i64) -> Result<Option<Note>, NoteError> {
        Ok(self.db.get_note(user_id, note_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::LifecycleManager;
    use chrono::Duration;

    fn engines() -> (Arc<Database>, QueryEngine, LifecycleManager) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.create_user("alice", "digest-a").unwrap();
        db.create_user("bob", "digest-b").unwrap();
        (
            Arc::clone(&db),
            QueryEngine::new(Arc::clone(&db)),
            LifecycleManager::new(db),
        )
    }

    fn filter(age: Option<&str>, search: Option<&str>, page: Option<&str>) -> FilterRequest {
        FilterRequest {
            age: age.map(str::to_string),
            search: search.map(str::to_string),
            page: page.map(str::to_string),
        }
    }

    fn backdate(db: &Database, note_id: i64, days: i64) {
        let conn = db.conn.lock().unwrap();
        let created_at = (Utc::now() - Duration::days(days)).to_rfc3339();
        conn.execute(
            "UPDATE notes SET created_at = ?1 WHERE id = ?2",
            rusqlite::params![created_at, note_id],
        )
        .unwrap();
    }

    #[test]
    fn test_pagination_across_25_notes() {
        let (_db, query, lifecycle) = engines();

        for i in 0..25 {
            lifecycle.create(1, &format!("note {i}"), "").unwrap();
        }

        let page1 = query.list(1, &filter(Some("alltime"), None, Some("1"))).unwrap();
        assert_eq!(page1.data.len(), 20);
        assert!(page1.has_more);

        let page2 = query.list(1, &filter(Some("alltime"), None, Some("2"))).unwrap();
        assert_eq!(page2.data.len(), 5);
        assert!(!page2.has_more);

        // No overlap between pages
        let page1_ids: Vec<i64> = page1.data.iter().map(|n| n.id).collect();
        assert!(page2.data.iter().all(|n| !page1_ids.contains(&n.id)));
    }

    #[test]
    fn test_has_more_heuristic_on_exactly_full_page() {
        let (_db, query, lifecycle) = engines();

        for i in 0..20 {
            lifecycle.create(1, &format!("note {i}"), "").unwrap();
        }

        // 20 of 20 rows returned, so the heuristic claims more exist
        let page1 = query.list(1, &filter(Some("alltime"), None, Some("1"))).unwrap();
        assert_eq!(page1.data.len(), 20);
        assert!(page1.has_more);

        let page2 = query.list(1, &filter(Some("alltime"), None, Some("2"))).unwrap();
        assert!(page2.data.is_empty());
        assert!(!page2.has_more);
    }

    #[test]
    fn test_search_matches_case_insensitive_substring() {
        let (_db, query, lifecycle) = engines();

        lifecycle.create(1, "Shopping List", "").unwrap();
        lifecycle.create(1, "Reading notes", "").unwrap();

        let hits = query.list(1, &filter(None, Some("shop"), None)).unwrap();
        assert_eq!(hits.data.len(), 1);
        assert_eq!(hits.data[0].title, "Shopping List");

        let misses = query.list(1, &filter(None, Some("xyz"), None)).unwrap();
        assert!(misses.data.is_empty());
    }

    #[test]
    fn test_one_week_bucket_cuts_by_age() {
        let (db, query, lifecycle) = engines();

        let recent = lifecycle.create(1, "recent", "").unwrap();
        let old = lifecycle.create(1, "old", "").unwrap();
        backdate(&db, recent.id, 2);
        backdate(&db, old.id, 10);

        let page = query.list(1, &filter(Some("1week"), None, None)).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "recent");
    }

    #[test]
    fn test_dated_buckets_exclude_archived_notes() {
        let (_db, query, lifecycle) = engines();

        let note = lifecycle.create(1, "archived away", "").unwrap();
        lifecycle.archive(1, note.id).unwrap();
        lifecycle.create(1, "still active", "").unwrap();

        let week = query.list(1, &filter(Some("1week"), None, None)).unwrap();
        assert_eq!(week.data.len(), 1);
        assert_eq!(week.data[0].title, "still active");

        let archive = query.list(1, &filter(Some("archive"), None, None)).unwrap();
        assert_eq!(archive.data.len(), 1);
        assert_eq!(archive.data[0].title, "archived away");

        // alltime sees both
        let all = query.list(1, &filter(Some("alltime"), None, None)).unwrap();
        assert_eq!(all.data.len(), 2);
    }

    #[test]
    fn test_get_never_leaks_foreign_notes() {
        let (_db, query, lifecycle) = engines();

        let note = lifecycle.create(1, "private", "secret").unwrap();
        assert!(query.get(2, note.id).unwrap().is_none());
        assert!(query.get(1, note.id).unwrap().is_some());
    }

    #[test]
    fn test_list_is_scoped_to_caller() {
        let (_db, query, lifecycle) = engines();

        lifecycle.create(1, "alice note", "").unwrap();
        lifecycle.create(2, "bob note", "").unwrap();

        let page = query.list(2, &filter(Some("alltime"), None, None)).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "bob note");
    }
}
