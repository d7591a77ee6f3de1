// src/domain/repositories/repository.rs
use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainResult;
use crate::domain::repositories::query::{BookmarkListQuery, ListPage, TagCount};

/// Repository trait for bookmark persistence. Methods speak in domain
/// terms; storage details stay behind the interface.
pub trait BookmarkRepository: std::fmt::Debug + Send + Sync {
    /// Persist a new bookmark and return the stored record, id assigned
    /// and timestamps exactly as written (read-your-writes).
    fn insert(&self, bookmark: &Bookmark) -> DomainResult<Bookmark>;

    /// Get a bookmark by its ID.
    fn get_by_id(&self, id: i32) -> DomainResult<Option<Bookmark>>;

    /// One page of bookmarks matching the query, newest first, together
    /// with the total match count independent of limit/offset.
    fn list(&self, query: &BookmarkListQuery) -> DomainResult<ListPage>;

    /// Delete a bookmark by ID. Idempotent: Ok(false) when nothing
    /// matched. Surviving ids never change.
    fn delete(&self, id: i32) -> DomainResult<bool>;

    /// All tags with their bookmark counts, most frequent first.
    fn tag_counts(&self) -> DomainResult<Vec<TagCount>>;

    /// Cheap probe proving the store answers queries.
    fn check_health(&self) -> DomainResult<()>;
}
