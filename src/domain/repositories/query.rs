// src/domain/repositories/query.rs
use serde::Serialize;

use crate::domain::bookmark::Bookmark;
use crate::domain::tag::Tag;

/// Page size used when the caller does not specify one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Filter and pagination parameters for bookmark listings.
#[derive(Debug, Clone)]
pub struct BookmarkListQuery {
    /// Case-insensitive substring matched across url, title, description,
    /// tags and note (OR-combined).
    pub query: Option<String>,
    /// Whole-token match against the canonical tags list.
    pub tag: Option<Tag>,
    pub limit: i64,
    pub offset: i64,
}

impl BookmarkListQuery {
    pub fn new() -> Self {
        Self {
            query: None,
            tag: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    pub fn with_query<S: Into<String>>(mut self, query: S) -> Self {
        let query = query.into();
        self.query = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for BookmarkListQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of results plus the filter-wide match count.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage {
    pub items: Vec<Bookmark>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// A tag together with the number of bookmarks carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: Tag,
    #[serde(rename = "count")]
    pub n: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_arguments_when_new_then_defaults_apply() {
        let query = BookmarkListQuery::new();
        assert!(query.query.is_none());
        assert!(query.tag.is_none());
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn given_blank_query_string_when_with_query_then_treated_as_no_filter() {
        let query = BookmarkListQuery::new().with_query("   ");
        assert!(query.query.is_none());
    }

    #[test]
    fn given_builder_chain_when_composed_then_all_fields_set() {
        let query = BookmarkListQuery::new()
            .with_query("rust")
            .with_tag(Tag::new("ai").unwrap())
            .with_limit(10)
            .with_offset(20);
        assert_eq!(query.query.as_deref(), Some("rust"));
        assert_eq!(query.tag.as_ref().map(Tag::value), Some("ai"));
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 20);
    }
}
