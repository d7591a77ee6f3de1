// src/domain/metadata.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Outcome classification of a metadata fetch, persisted with the bookmark.
///
/// `ParseError` is part of the stored taxonomy (older stores contain it)
/// even though the current extractor recovers from malformed markup
/// instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataStatus {
    Ok,
    FetchError,
    ParseError,
}

impl MetadataStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataStatus::Ok => "ok",
            MetadataStatus::FetchError => "fetch_error",
            MetadataStatus::ParseError => "parse_error",
        }
    }
}

impl fmt::Display for MetadataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetadataStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(MetadataStatus::Ok),
            "fetch_error" => Ok(MetadataStatus::FetchError),
            "parse_error" => Ok(MetadataStatus::ParseError),
            other => Err(DomainError::Other(format!(
                "Unknown metadata status: {}",
                other
            ))),
        }
    }
}

/// Raw captures from one streaming pass over an HTML document. Fields hold
/// whatever the document declared; the og:*-over-document fallback is
/// applied by [`PageMetadata::resolve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_site_name: Option<String>,
}

/// Metadata after fallback resolution, ready to persist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub site_name: Option<String>,
}

impl PageMetadata {
    /// og:title/og:description win over `<title>` and the description meta
    /// tag. Empty captures never surface.
    pub fn resolve(self) -> ResolvedMetadata {
        ResolvedMetadata {
            title: non_empty(self.og_title).or_else(|| non_empty(self.title)),
            description: non_empty(self.og_description).or_else(|| non_empty(self.description)),
            image_url: non_empty(self.og_image),
            site_name: non_empty(self.og_site_name),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Everything a fetch attempt produced. All failure modes are encoded
/// here; fetching never surfaces as an error to the ingestion pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataResult {
    pub status: MetadataStatus,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub site_name: Option<String>,
    pub http_status: Option<u16>,
    pub error_message: Option<String>,
}

impl MetadataResult {
    pub fn ok(resolved: ResolvedMetadata, http_status: u16) -> Self {
        Self {
            status: MetadataStatus::Ok,
            title: resolved.title,
            description: resolved.description,
            image_url: resolved.image_url,
            site_name: resolved.site_name,
            http_status: Some(http_status),
            error_message: None,
        }
    }

    pub fn fetch_error<M: Into<String>>(message: M, http_status: Option<u16>) -> Self {
        Self {
            status: MetadataStatus::FetchError,
            title: None,
            description: None,
            image_url: None,
            site_name: None,
            http_status,
            error_message: Some(message.into()),
        }
    }

    /// Fetch failed with a non-200 response. The status code itself is the
    /// whole story, so no message is recorded.
    pub fn http_error(http_status: u16) -> Self {
        Self {
            status: MetadataStatus::FetchError,
            title: None,
            description: None,
            image_url: None,
            site_name: None,
            http_status: Some(http_status),
            error_message: None,
        }
    }
}

/// Decides whether a URL may be fetched at all. Implementations must fail
/// closed: any doubt (bad scheme, missing host, failed resolution, one
/// non-routable address) means unsafe.
pub trait ReachabilityGuard: Send + Sync + fmt::Debug {
    fn is_safe(&self, url: &str) -> bool;
}

/// Fetches page metadata for an already-normalized URL.
pub trait MetadataFetcher: Send + Sync + fmt::Debug {
    fn fetch(&self, url: &str) -> MetadataResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_og_fields_when_resolve_then_og_wins_over_document_fields() {
        let page = PageMetadata {
            title: Some("Doc Title".to_string()),
            description: Some("Doc Desc".to_string()),
            og_title: Some("OG Title".to_string()),
            og_description: Some("OG Desc".to_string()),
            og_image: Some("https://example.com/i.png".to_string()),
            og_site_name: Some("Example".to_string()),
        };

        let resolved = page.resolve();
        assert_eq!(resolved.title.as_deref(), Some("OG Title"));
        assert_eq!(resolved.description.as_deref(), Some("OG Desc"));
        assert_eq!(resolved.image_url.as_deref(), Some("https://example.com/i.png"));
        assert_eq!(resolved.site_name.as_deref(), Some("Example"));
    }

    #[test]
    fn given_missing_og_fields_when_resolve_then_falls_back_to_document_fields() {
        let page = PageMetadata {
            title: Some("Doc Title".to_string()),
            description: Some("Doc Desc".to_string()),
            ..Default::default()
        };

        let resolved = page.resolve();
        assert_eq!(resolved.title.as_deref(), Some("Doc Title"));
        assert_eq!(resolved.description.as_deref(), Some("Doc Desc"));
        assert!(resolved.image_url.is_none());
        assert!(resolved.site_name.is_none());
    }

    #[test]
    fn given_empty_og_title_when_resolve_then_treated_as_absent() {
        let page = PageMetadata {
            title: Some("Doc Title".to_string()),
            og_title: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(page.resolve().title.as_deref(), Some("Doc Title"));
    }

    #[test]
    fn given_status_strings_when_parse_then_round_trip() {
        for status in [
            MetadataStatus::Ok,
            MetadataStatus::FetchError,
            MetadataStatus::ParseError,
        ] {
            assert_eq!(status.as_str().parse::<MetadataStatus>().unwrap(), status);
        }
        assert!("bogus".parse::<MetadataStatus>().is_err());
    }
}
