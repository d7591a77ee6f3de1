// src/infrastructure/json.rs

use crate::domain::bookmark::Bookmark;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::query::ListPage;
use serde::Serialize;
use std::io::Write;

/// Structure for serializing bookmarks to JSON output.
///
/// Tags are emitted as an array rather than the stored comma string, and
/// timestamps as RFC 3339.
#[derive(Serialize)]
pub struct JsonBookmarkView {
    pub id: Option<i32>,
    pub created_at: String,
    pub url: String,
    pub url_norm: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub site_name: Option<String>,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub status: String,
    pub http_status: Option<u16>,
    pub error_message: Option<String>,
}

impl JsonBookmarkView {
    /// Create from a domain `Bookmark`
    pub fn from_domain(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.id,
            created_at: bookmark.created_at.to_rfc3339(),
            url: bookmark.url.clone(),
            url_norm: bookmark.url_norm.clone(),
            title: bookmark.title.clone(),
            description: bookmark.description.clone(),
            image_url: bookmark.image_url.clone(),
            site_name: bookmark.site_name.clone(),
            tags: bookmark
                .tags
                .as_ref()
                .map(|tags| {
                    tags.tags()
                        .iter()
                        .map(|tag| tag.value().to_string())
                        .collect()
                })
                .unwrap_or_default(),
            note: bookmark.note.clone(),
            status: bookmark.status.as_str().to_string(),
            http_status: bookmark.http_status,
            error_message: bookmark.error_message.clone(),
        }
    }

    /// Convert a slice of bookmarks into a vector of JSON views
    pub fn from_domain_collection(bookmarks: &[Bookmark]) -> Vec<Self> {
        bookmarks.iter().map(Self::from_domain).collect()
    }
}

/// One page of list results in the shape consumers paginate with.
#[derive(Serialize)]
pub struct JsonListPageView {
    pub items: Vec<JsonBookmarkView>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl JsonListPageView {
    pub fn from_page(page: &ListPage) -> Self {
        Self {
            items: JsonBookmarkView::from_domain_collection(&page.items),
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// Serializes a value as pretty JSON and writes it to standard output.
/// Standard output is used for pipeable content without colors or formatting
pub fn write_as_json<T: Serialize>(value: &T) -> DomainResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        DomainError::BookmarkOperationFailed(format!("Failed to serialize to JSON: {}", e))
    })?;

    println!("{}", json);

    // Flush stdout to ensure immediate output
    std::io::stdout().flush().map_err(|e| {
        DomainError::BookmarkOperationFailed(format!("Failed to flush stdout: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookmark::BookmarkBuilder;
    use crate::domain::metadata::MetadataStatus;
    use crate::domain::tag::{normalize_tags, TagInput};
    use chrono::{TimeZone, Utc};

    fn sample_bookmark() -> Bookmark {
        BookmarkBuilder::default()
            .id(Some(3))
            .created_at(Utc.with_ymd_and_hms(2026, 5, 10, 9, 45, 12).unwrap())
            .url("https://Example.com/a/".to_string())
            .url_norm("https://example.com/a".to_string())
            .title(Some("Example".to_string()))
            .tags(normalize_tags(Some(&TagInput::from("Work, AI"))))
            .status(MetadataStatus::Ok)
            .http_status(Some(200u16))
            .build()
            .unwrap()
    }

    #[test]
    fn test_bookmark_view_shape() {
        let view = JsonBookmarkView::from_domain(&sample_bookmark());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["url"], "https://Example.com/a/");
        assert_eq!(json["url_norm"], "https://example.com/a");
        assert_eq!(json["tags"], serde_json::json!(["work", "ai"]));
        assert_eq!(json["status"], "ok");
        assert_eq!(json["http_status"], 200);
        assert!(json["note"].is_null());
        assert!(json["error_message"].is_null());
        assert!(json["created_at"]
            .as_str()
            .unwrap()
            .starts_with("2026-05-10T09:45:12"));
    }

    #[test]
    fn test_untagged_bookmark_serializes_empty_array() {
        let mut bookmark = sample_bookmark();
        bookmark.tags = None;
        let view = JsonBookmarkView::from_domain(&bookmark);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_list_page_view_shape() {
        let page = ListPage {
            items: vec![sample_bookmark()],
            total: 7,
            limit: 50,
            offset: 0,
        };
        let json = serde_json::to_value(JsonListPageView::from_page(&page)).unwrap();
        assert_eq!(json["total"], 7);
        assert_eq!(json["limit"], 50);
        assert_eq!(json["offset"], 0);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
    }
}
