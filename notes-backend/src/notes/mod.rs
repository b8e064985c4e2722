//! Note query & lifecycle engine.
//!
//! Turns a filter request (age bucket, free-text search, page) into a
//! deterministic, paginated result set, and enforces the note lifecycle
//! (active ⇄ archived → deleted) under per-user ownership. The HTTP layer
//! resolves the caller's identity before calling in; the engines take that
//! identity as an explicit, required parameter on every operation.

pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod query;

pub use error::NoteError;
pub use filter::{AgeBucket, CompiledQuery, FilterRequest, PAGE_SIZE};
pub use lifecycle::LifecycleManager;
pub use query::QueryEngine;
