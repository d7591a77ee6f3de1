// src/domain/bookmark.rs
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::Serialize;
use std::fmt;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::metadata::MetadataStatus;
use crate::domain::tag::{Tag, TagList};

/// A bookmark as produced by the ingestion pipeline.
///
/// `url_norm` is always the canonical form of `url`; `tags` is either a
/// canonical list or `None`, never empty. A bookmark whose fetch failed
/// still carries url, url_norm, tags and note — only the metadata fields
/// stay empty (partial success).
#[derive(Builder, Clone, Debug, PartialEq, Serialize)]
#[builder(setter(into))]
pub struct Bookmark {
    #[builder(default)]
    pub id: Option<i32>,
    #[builder(default = "Utc::now()")]
    pub created_at: DateTime<Utc>,
    pub url: String,
    pub url_norm: String,
    #[builder(default)]
    pub title: Option<String>,
    #[builder(default)]
    pub description: Option<String>,
    #[builder(default)]
    pub image_url: Option<String>,
    #[builder(default)]
    pub site_name: Option<String>,
    #[builder(default)]
    pub tags: Option<TagList>,
    #[builder(default)]
    pub note: Option<String>,
    #[builder(default = "MetadataStatus::Ok")]
    pub status: MetadataStatus,
    #[builder(default)]
    pub http_status: Option<u16>,
    #[builder(default)]
    pub error_message: Option<String>,
}

impl Bookmark {
    /// Rebuild a bookmark from its storage representation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: i32,
        created_at: DateTime<Utc>,
        url: String,
        url_norm: String,
        title: Option<String>,
        description: Option<String>,
        image_url: Option<String>,
        site_name: Option<String>,
        tags: Option<String>,
        note: Option<String>,
        status: &str,
        http_status: Option<i32>,
        error_message: Option<String>,
    ) -> DomainResult<Self> {
        let status = status.parse::<MetadataStatus>()?;
        let tags = tags.as_deref().and_then(TagList::parse);
        let http_status = http_status
            .map(u16::try_from)
            .transpose()
            .map_err(|_| DomainError::Other("HTTP status out of range".to_string()))?;

        Ok(Self {
            id: Some(id),
            created_at,
            url,
            url_norm,
            title,
            description,
            image_url,
            site_name,
            tags,
            note,
            status,
            http_status,
            error_message,
        })
    }

    /// Canonical comma-joined tag string for storage, `None` when untagged.
    pub fn tags_string(&self) -> Option<String> {
        self.tags.as_ref().map(TagList::to_string)
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.as_ref().is_some_and(|tags| tags.contains(tag))
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.id.map_or("New".to_string(), |id| id.to_string()),
            self.title.as_deref().unwrap_or(&self.url),
            self.url_norm,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tag::{normalize_tags, TagInput};

    fn sample_bookmark() -> Bookmark {
        BookmarkBuilder::default()
            .url("https://Example.com/a/".to_string())
            .url_norm("https://example.com/a".to_string())
            .title(Some("Example".to_string()))
            .tags(normalize_tags(Some(&TagInput::from("AI,Work"))))
            .status(MetadataStatus::Ok)
            .http_status(Some(200u16))
            .build()
            .unwrap()
    }

    #[test]
    fn given_builder_when_build_then_defaults_are_applied() {
        let bookmark = sample_bookmark();
        assert!(bookmark.id.is_none());
        assert!(bookmark.note.is_none());
        assert!(bookmark.error_message.is_none());
        assert_eq!(bookmark.status, MetadataStatus::Ok);
        assert_eq!(bookmark.tags_string().as_deref(), Some("ai,work"));
    }

    #[test]
    fn given_builder_without_url_when_build_then_fails() {
        let result = BookmarkBuilder::default()
            .url_norm("https://example.com".to_string())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn given_storage_row_when_from_storage_then_fields_hydrate() {
        let bookmark = Bookmark::from_storage(
            7,
            Utc::now(),
            "https://example.com/a/".to_string(),
            "https://example.com/a".to_string(),
            Some("Title".to_string()),
            None,
            None,
            Some("Example".to_string()),
            Some("ai,work".to_string()),
            Some("check later".to_string()),
            "fetch_error",
            Some(503),
            Some("Service Unavailable".to_string()),
        )
        .unwrap();

        assert_eq!(bookmark.id, Some(7));
        assert_eq!(bookmark.status, MetadataStatus::FetchError);
        assert_eq!(bookmark.http_status, Some(503));
        assert!(bookmark.has_tag(&Tag::new("ai").unwrap()));
        assert!(!bookmark.has_tag(&Tag::new("aim").unwrap()));
    }

    #[test]
    fn given_unknown_status_when_from_storage_then_error() {
        let result = Bookmark::from_storage(
            1,
            Utc::now(),
            "https://example.com".to_string(),
            "https://example.com".to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            "weird",
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn given_bookmark_when_serialized_then_canonical_json_fields() {
        let bookmark = sample_bookmark();
        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["url_norm"], "https://example.com/a");
        assert_eq!(json["tags"], "ai,work");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["http_status"], 200);
        assert!(json["note"].is_null());
    }
}
