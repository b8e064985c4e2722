//! Filter compiler — normalizes a raw filter request into an ordered
//! predicate set the store adapter can execute.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Fixed number of rows per result page
pub const PAGE_SIZE: i64 = 20;

/// Named time-window filters evaluated against `created_at`.
///
/// The dated buckets select active notes only; `archive` selects archived
/// notes with no date constraint; `alltime` selects everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeBucket {
    #[default]
    OneWeek,
    OneMonth,
    ThreeMonth,
    AllTime,
    Archive,
}

impl AgeBucket {
    /// Parse the wire value. Unrecognized or absent values fall back to
    /// the one-week window.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("1week") => AgeBucket::OneWeek,
            Some("1month") => AgeBucket::OneMonth,
            Some("3month") => AgeBucket::ThreeMonth,
            Some("alltime") => AgeBucket::AllTime,
            Some("archive") => AgeBucket::Archive,
            _ => AgeBucket::OneWeek,
        }
    }

    fn window_days(&self) -> Option<i64> {
        match self {
            AgeBucket::OneWeek => Some(7),
            AgeBucket::OneMonth => Some(30),
            AgeBucket::ThreeMonth => Some(90),
            AgeBucket::AllTime | AgeBucket::Archive => None,
        }
    }
}

/// One query's worth of filter input, as it arrives from the HTTP layer.
/// All fields are raw strings so that malformed values normalize instead
/// of failing query-string deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRequest {
    pub age: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

impl FilterRequest {
    /// Normalize into a predicate set, evaluated at request time `now`.
    ///
    /// The compiled query never carries the ownership scope; the store
    /// adapter binds `user_id` itself on every list call, so a compiler
    /// bug cannot widen a query across users.
    pub fn compile(&self, now: DateTime<Utc>) -> CompiledQuery {
        let bucket = AgeBucket::parse(self.age.as_deref());

        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        CompiledQuery {
            archived: match bucket {
                AgeBucket::Archive => Some(true),
                AgeBucket::AllTime => None,
                _ => Some(false),
            },
            created_after: bucket.window_days().map(|days| now - Duration::days(days)),
            title_substring: search,
            limit: PAGE_SIZE,
            offset: PAGE_SIZE.saturating_mul(page - 1),
        }
    }
}

/// Normalized predicates ready for the store adapter
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub archived: Option<bool>,
    pub created_after: Option<DateTime<Utc>>,
    pub title_substring: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
