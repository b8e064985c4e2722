use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single user-owned note.
///
/// `owner_id` and `id` together identify the note permanently; every read
/// and write against the store is scoped by `owner_id`. `text` is the raw
/// source-of-truth content, rendering happens downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub is_archived: bool,
}

/// One page of query results, newest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    pub data: Vec<Note>,
    pub has_more: bool,
}

/// Request to create a note
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// Request to edit a note. Both fields are required: an edit is a full
/// replace of title and text, not a partial patch.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub text: String,
}
