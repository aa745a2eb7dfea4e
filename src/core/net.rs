// src/core/net.rs
// Fetch capability: HTTP GET with our User-Agent and a hard timeout.
// The status is checked before any body is handed to a parser.

use std::collections::HashMap;

use reqwest::blocking::Client;

use crate::config::options::FetchOptions;
use crate::error::FetchError;

/// Anything that can turn a URL into a body. Extractors only see this trait,
/// so specs can be exercised offline.
pub trait Fetch: Send + Sync {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(opts: &FetchOptions) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(opts.user_agent.clone())
            .timeout(opts.timeout)
            .build()
            .map_err(|source| FetchError::Request { url: s!("<client>"), source })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpClient {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let t = std::time::Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request { url: s!(url), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: s!(url), status: status.as_u16() });
        }
        let body = resp
            .text()
            .map_err(|source| FetchError::Request { url: s!(url), source })?;
        tracing::debug!(url, bytes = body.len(), elapsed = ?t.elapsed(), "fetched");
        Ok(body)
    }
}

/// Offline fetcher backed by a URL → body map. Unknown URLs answer 404.
#[derive(Default, Clone)]
pub struct StaticFetch {
    pages: HashMap<String, String>,
}

impl StaticFetch {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(s!(url), s!(body));
        self
    }
}

impl Fetch for StaticFetch {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status { url: s!(url), status: 404 })
    }
}
