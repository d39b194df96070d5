// Gutendex catalog client
//
// Thin blocking collaborator around GET /books/?search=..&languages=..
// The ingestion core only ever sees the decoded candidate list; one call,
// no pagination, no caching, no retries.

use crate::catalog::{CandidateBook, SearchPage};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://gutendex.com/books/";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("catalog returned status {0}")]
    BadStatus(u16),

    #[error("failed to decode catalog response: {0}")]
    Decode(String),
}

/// Blocking HTTP client for the external book catalog.
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new() -> Self {
        CatalogClient {
            http: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        CatalogClient {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search the catalog by title, optionally filtered to one language.
    /// Returns the candidate records in catalog order.
    pub fn search(
        &self,
        title: &str,
        language_filter: Option<&str>,
    ) -> Result<Vec<CandidateBook>, SearchError> {
        let url = self.search_url(title, language_filter);

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::BadStatus(status.as_u16()));
        }

        let page: SearchPage = response
            .json()
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        Ok(page.results)
    }

    fn search_url(&self, title: &str, language_filter: Option<&str>) -> String {
        let mut url = format!("{}?search={}", self.base_url, urlencoding::encode(title.trim()));
        if let Some(code) = language_filter {
            url.push_str("&languages=");
            url.push_str(code);
        }
        url
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}
