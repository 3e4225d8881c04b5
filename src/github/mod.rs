pub mod types;

pub use types::RepoRef;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid repository reference: {0}")]
    InvalidRepo(String),
}

/// One fetched page: parsed body plus the opaque `rel="next"` target when the
/// server supplied one.
#[derive(Debug, Clone)]
pub struct Page {
    pub body: Value,
    pub next: Option<String>,
}

/// Request primitive behind [`GitHubClient`]. Swapped out for a canned
/// transport in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET. Non-2xx responses surface as [`GitHubError::Status`].
    async fn get(&self, url: &str) -> Result<Page, GitHubError>;
}

/// reqwest-backed transport speaking to the live API.
pub struct HttpTransport {
    http: reqwest::Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Page, GitHubError> {
        debug!(url = %url, "GET");
        let mut request = self.http.get(url).header("User-Agent", "fork-radar");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(GitHubError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let next = next_page_link(response.headers());
        let body = response.json().await?;
        Ok(Page { body, next })
    }
}

/// Extracts the `rel="next"` target from a response's `Link` header.
fn next_page_link(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(raw)
}

/// Parses an RFC 5988 `Link` header value such as
/// `<https://api.github.com/...?page=2>; rel="next", <...>; rel="last"`.
fn parse_next_link(header: &str) -> Option<String> {
    for entry in header.split(',') {
        let (target, params) = match entry.split_once(';') {
            Some(parts) => parts,
            None => continue,
        };
        let target = target.trim();
        if !target.starts_with('<') || !target.ends_with('>') {
            continue;
        }
        if params.split(';').any(|param| param.trim() == r#"rel="next""#) {
            return Some(target[1..target.len() - 1].to_string());
        }
    }
    None
}

/// Client over the GitHub REST API: single-resource fetches, a 404-tolerant
/// variant, and `Link`-paginated listings.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn Transport>,
    api_base: String,
}

impl GitHubClient {
    /// Client against the production API. The token is optional; requests go
    /// out unauthenticated, and harder rate-limited, without one.
    pub fn new(token: Option<String>) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(token)), GITHUB_API)
    }

    /// Client over an arbitrary transport and base URL.
    pub fn with_transport(transport: Arc<dyn Transport>, api_base: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
        }
    }

    /// Joins an API path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// Fetch one resource. Any non-2xx status aborts with an error.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        let page = self.transport.get(url).await?;
        Ok(serde_json::from_value(page.body)?)
    }

    /// Fetch one resource, mapping a 404 to `None`. Used where absence is a
    /// normal outcome, like `releases/latest` on a repo with no releases.
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, GitHubError> {
        match self.transport.get(url).await {
            Ok(page) => Ok(Some(serde_json::from_value(page.body)?)),
            Err(GitHubError::Status { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Fetch a paginated listing, following `rel="next"` links until the
    /// server stops supplying them. Items keep server order, concatenated
    /// across pages.
    pub async fn fetch_paginated<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Vec<T>, GitHubError> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        while let Some(url) = next {
            let page = self.transport.get(&url).await?;
            let chunk: Vec<Value> = serde_json::from_value(page.body)?;
            debug!(url = %url, items = chunk.len(), "fetched page");
            for item in chunk {
                items.push(serde_json::from_value(item)?);
            }
            next = page.next;
        }
        Ok(items)
    }
}

/// Parse a repository reference from an `owner/repo` slug or a full GitHub
/// URL like `https://github.com/owner/repo`.
pub fn parse_repo_ref(input: &str) -> Result<RepoRef, GitHubError> {
    let trimmed = input
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .trim_start_matches("github.com/");
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let trimmed = trimmed.trim_matches('/');

    let mut segments = trimmed.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok(RepoRef::new(owner, name))
        }
        _ => Err(GitHubError::InvalidRepo(input.to_string())),
    }
}
