// src/infrastructure/http.rs
//! Metadata fetchers. The real one speaks HTTP with a bounded body read;
//! the stub one answers with a fixed record for tests and offline use.
//! Both consult the reachability guard before anything else.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::config::FetchSettings;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::metadata::{MetadataFetcher, MetadataResult, MetadataStatus, ReachabilityGuard};
use crate::infrastructure::html::extract_page_metadata;

pub const UNSAFE_URL_MESSAGE: &str = "Unsafe URL or invalid hostname";
pub const RESPONSE_TOO_LARGE_MESSAGE: &str = "Response too large";

/// Fetches pages over HTTP(S) and extracts their metadata.
///
/// Every failure mode is folded into the returned [`MetadataResult`];
/// callers never see an error from `fetch`.
#[derive(Debug)]
pub struct HttpMetadataFetcher {
    client: reqwest::blocking::Client,
    guard: Arc<dyn ReachabilityGuard>,
    max_body_bytes: u64,
}

impl HttpMetadataFetcher {
    pub fn new(guard: Arc<dyn ReachabilityGuard>, settings: &FetchSettings) -> DomainResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| {
                DomainError::CannotFetchMetadata(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            guard,
            max_body_bytes: settings.max_body_bytes,
        })
    }
}

impl MetadataFetcher for HttpMetadataFetcher {
    #[instrument(skip(self), level = "debug")]
    fn fetch(&self, url: &str) -> MetadataResult {
        if !self.guard.is_safe(url) {
            debug!("Reachability guard rejected {}", url);
            return MetadataResult::fetch_error(UNSAFE_URL_MESSAGE, None);
        }

        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) => return MetadataResult::fetch_error(e.to_string(), None),
        };

        let status = response.status();
        if status != StatusCode::OK {
            debug!("Non-200 response for {}: {}", url, status);
            return MetadataResult::http_error(status.as_u16());
        }

        // Read one byte past the cap so an oversize body is detectable
        // without ever buffering more than the cap itself.
        let mut body = Vec::new();
        if let Err(e) = response
            .take(self.max_body_bytes + 1)
            .read_to_end(&mut body)
        {
            return MetadataResult::fetch_error(e.to_string(), None);
        }
        if body.len() as u64 > self.max_body_bytes {
            debug!(
                "Response for {} exceeds the {} byte cap",
                url, self.max_body_bytes
            );
            return MetadataResult::fetch_error(RESPONSE_TOO_LARGE_MESSAGE, Some(status.as_u16()));
        }

        let html = String::from_utf8_lossy(&body);
        let resolved = extract_page_metadata(&html).resolve();
        MetadataResult::ok(resolved, status.as_u16())
    }
}

/// Answers every safe URL with the same canned record. No network access.
#[derive(Debug)]
pub struct StubMetadataFetcher {
    guard: Arc<dyn ReachabilityGuard>,
}

impl StubMetadataFetcher {
    pub fn new(guard: Arc<dyn ReachabilityGuard>) -> Self {
        Self { guard }
    }
}

impl MetadataFetcher for StubMetadataFetcher {
    #[instrument(skip(self), level = "debug")]
    fn fetch(&self, url: &str) -> MetadataResult {
        if !self.guard.is_safe(url) {
            debug!("Reachability guard rejected {}", url);
            return MetadataResult::fetch_error(UNSAFE_URL_MESSAGE, None);
        }

        MetadataResult {
            status: MetadataStatus::Ok,
            title: Some("Stub Title".to_string()),
            description: Some("Stub Description".to_string()),
            image_url: Some("https://example.com/stub.png".to_string()),
            site_name: Some("Stub Site".to_string()),
            http_status: Some(200),
            error_message: None,
        }
    }
}
