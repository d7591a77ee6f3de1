// src/application/services/bookmark_service_impl.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::bookmark_service::{BookmarkService, DbHealth, HealthReport};
use crate::domain::bookmark::{Bookmark, BookmarkBuilder};
use crate::domain::error::DomainError;
use crate::domain::metadata::{MetadataFetcher, MetadataStatus};
use crate::domain::repositories::query::{BookmarkListQuery, ListPage, TagCount};
use crate::domain::repositories::repository::BookmarkRepository;
use crate::domain::tag::{normalize_tags, TagInput};
use crate::domain::url::{is_fetchable_scheme, normalize_url};

#[derive(Debug)]
pub struct BookmarkServiceImpl<R: BookmarkRepository> {
    repository: Arc<R>,
    fetcher: Arc<dyn MetadataFetcher>,
}

impl<R: BookmarkRepository> BookmarkServiceImpl<R> {
    pub fn new(repository: Arc<R>, fetcher: Arc<dyn MetadataFetcher>) -> Self {
        Self {
            repository,
            fetcher,
        }
    }

    #[instrument(skip(self), level = "trace")]
    fn validate_bookmark_id(&self, id: i32) -> ApplicationResult<()> {
        if id <= 0 {
            return Err(ApplicationError::Validation(format!(
                "Invalid bookmark ID: {}",
                id
            )));
        }
        Ok(())
    }

    #[instrument(skip_all, level = "trace")]
    fn validate_pagination(&self, query: &BookmarkListQuery) -> ApplicationResult<()> {
        if query.limit < 0 {
            return Err(ApplicationError::Validation(format!(
                "Limit must not be negative: {}",
                query.limit
            )));
        }
        if query.offset < 0 {
            return Err(ApplicationError::Validation(format!(
                "Offset must not be negative: {}",
                query.offset
            )));
        }
        Ok(())
    }
}

impl<R: BookmarkRepository> BookmarkService for BookmarkServiceImpl<R> {
    #[instrument(skip(self, tags, note), level = "debug", fields(url = %url))]
    fn add_bookmark(
        &self,
        url: &str,
        tags: Option<&TagInput>,
        note: Option<&str>,
    ) -> ApplicationResult<Bookmark> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ApplicationError::Validation(
                "URL must not be empty".to_string(),
            ));
        }

        // Reject before any fetch or insert: malformed input and schemes
        // the pipeline will not follow persist nothing.
        let parsed = Url::parse(url).map_err(|e| {
            ApplicationError::Validation(format!("Invalid URL '{}': {}", url, e))
        })?;
        if !is_fetchable_scheme(parsed.scheme()) {
            return Err(ApplicationError::Validation(format!(
                "Unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }

        let url_norm = normalize_url(url)?;

        let metadata = self.fetcher.fetch(&url_norm);
        if metadata.status != MetadataStatus::Ok {
            // The bookmark is still persisted; the failed fetch travels
            // with it as status + error_message.
            warn!(
                "Metadata fetch failed for {}: {}",
                url_norm,
                metadata.error_message.as_deref().unwrap_or("unknown")
            );
        }

        let bookmark = BookmarkBuilder::default()
            .url(url.to_string())
            .url_norm(url_norm)
            .title(metadata.title)
            .description(metadata.description)
            .image_url(metadata.image_url)
            .site_name(metadata.site_name)
            .tags(normalize_tags(tags))
            .note(note.map(String::from))
            .status(metadata.status)
            .http_status(metadata.http_status)
            .error_message(metadata.error_message)
            .build()
            .map_err(DomainError::from)?;

        let stored = self.repository.insert(&bookmark)?;
        debug!("Added bookmark {}", stored);
        Ok(stored)
    }

    #[instrument(skip(self), level = "debug")]
    fn get_bookmark(&self, id: i32) -> ApplicationResult<Option<Bookmark>> {
        self.validate_bookmark_id(id)?;
        Ok(self.repository.get_by_id(id)?)
    }

    #[instrument(skip_all, level = "debug")]
    fn list_bookmarks(&self, query: &BookmarkListQuery) -> ApplicationResult<ListPage> {
        self.validate_pagination(query)?;
        Ok(self.repository.list(query)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn delete_bookmark(&self, id: i32) -> ApplicationResult<bool> {
        self.validate_bookmark_id(id)?;
        Ok(self.repository.delete(id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn tag_counts(&self) -> ApplicationResult<Vec<TagCount>> {
        Ok(self.repository.tag_counts()?)
    }

    #[instrument(skip(self), level = "debug")]
    fn health(&self) -> HealthReport {
        let db = match self.repository.check_health() {
            Ok(()) => DbHealth::Ok,
            Err(e) => {
                warn!("Store health check failed: {}", e);
                DbHealth::Ng
            }
        };
        HealthReport {
            time: Utc::now(),
            db,
        }
    }
}
