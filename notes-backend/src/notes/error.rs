use thiserror::Error;

/// Failures surfaced by the note engine.
///
/// Not-found is not an error: operations on an absent (or foreign-owned)
/// note return `Ok(None)` / `Ok(false)` so that "does not exist" and "is
/// not yours" stay indistinguishable to the caller.
#[derive(Debug, Error)]
pub enum NoteError {
    /// Malformed input the caller can correct and resend
    #[error("title must not be empty")]
    EmptyTitle,

    /// The store failed or could not be reached; retryable by the caller
    #[error("storage unavailable: {0}")]
    Storage(#[from] rusqlite::Error),
}
