// src/infrastructure/di/service_container.rs

use std::sync::Arc;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::BookmarkService;
use crate::application::BookmarkServiceImpl;
use crate::config::Settings;
use crate::domain::metadata::{MetadataFetcher, ReachabilityGuard};
use crate::infrastructure::http::{HttpMetadataFetcher, StubMetadataFetcher};
use crate::infrastructure::net::DnsReachabilityGuard;
use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;

/// Production service container - single source of truth for service creation
pub struct ServiceContainer {
    pub bookmark_repository: Arc<SqliteBookmarkRepository>,
    pub reachability_guard: Arc<dyn ReachabilityGuard>,
    pub metadata_fetcher: Arc<dyn MetadataFetcher>,
    pub bookmark_service: Arc<dyn BookmarkService>,
}

impl ServiceContainer {
    /// Create all services with explicit dependency injection
    pub fn new(config: &Settings) -> ApplicationResult<Self> {
        let bookmark_repository = Self::create_repository(&config.db_url)?;
        let reachability_guard: Arc<dyn ReachabilityGuard> = Arc::new(DnsReachabilityGuard::new());
        let metadata_fetcher = Self::create_fetcher(config, reachability_guard.clone())?;

        let bookmark_service = Arc::new(BookmarkServiceImpl::new(
            bookmark_repository.clone(),
            metadata_fetcher.clone(),
        ));

        Ok(Self {
            bookmark_repository,
            reachability_guard,
            metadata_fetcher,
            bookmark_service,
        })
    }

    fn create_repository(db_url: &str) -> ApplicationResult<Arc<SqliteBookmarkRepository>> {
        // Creates the database file and runs pending migrations on first
        // open; subsequent opens are no-ops.
        let repository = SqliteBookmarkRepository::from_url(db_url).map_err(|e| {
            ApplicationError::Other(format!("Failed to open bookmark database: {}", e))
        })?;

        Ok(Arc::new(repository))
    }

    fn create_fetcher(
        config: &Settings,
        guard: Arc<dyn ReachabilityGuard>,
    ) -> ApplicationResult<Arc<dyn MetadataFetcher>> {
        if config.fetch.stub {
            return Ok(Arc::new(StubMetadataFetcher::new(guard)));
        }

        let fetcher = HttpMetadataFetcher::new(guard, &config.fetch).map_err(|e| {
            ApplicationError::Other(format!("Failed to build metadata fetcher: {}", e))
        })?;

        Ok(Arc::new(fetcher))
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("bookmark_repository", &"Arc<SqliteBookmarkRepository>")
            .field("reachability_guard", &"Arc<dyn ReachabilityGuard>")
            .field("metadata_fetcher", &"Arc<dyn MetadataFetcher>")
            .field("bookmark_service", &"Arc<dyn BookmarkService>")
            .finish()
    }
}
