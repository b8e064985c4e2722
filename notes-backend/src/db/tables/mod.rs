//! Table operations, split into one `impl Database` block per table.

mod auth_sessions;
mod notes;
mod users;
