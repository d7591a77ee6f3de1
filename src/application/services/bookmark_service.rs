// src/application/services/bookmark_service.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Debug;

use crate::application::error::ApplicationResult;
use crate::domain::bookmark::Bookmark;
use crate::domain::repositories::query::{BookmarkListQuery, ListPage, TagCount};
use crate::domain::tag::TagInput;

/// Health of the durable store as seen through the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbHealth {
    Ok,
    Ng,
}

/// Snapshot returned by the health probe. Probing never fails; a broken
/// store shows up as `db: ng`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub time: DateTime<Utc>,
    pub db: DbHealth,
}

/// Service interface for bookmark-related operations
pub trait BookmarkService: Send + Sync + Debug {
    /// Ingest a URL end-to-end: canonicalize, fetch metadata behind the
    /// reachability guard, normalize tags, persist. A failed fetch still
    /// persists the bookmark (with its failure recorded); an invalid or
    /// non-http(s) URL persists nothing.
    fn add_bookmark(
        &self,
        url: &str,
        tags: Option<&TagInput>,
        note: Option<&str>,
    ) -> ApplicationResult<Bookmark>;

    /// Get a bookmark by ID
    fn get_bookmark(&self, id: i32) -> ApplicationResult<Option<Bookmark>>;

    /// List bookmarks with filtering and pagination, newest first
    fn list_bookmarks(&self, query: &BookmarkListQuery) -> ApplicationResult<ListPage>;

    /// Delete a bookmark by ID; idempotent
    fn delete_bookmark(&self, id: i32) -> ApplicationResult<bool>;

    /// All tags with usage counts, most frequent first
    fn tag_counts(&self) -> ApplicationResult<Vec<TagCount>>;

    /// Probe the store
    fn health(&self) -> HealthReport;
}
