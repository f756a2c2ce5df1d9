//! Page fetcher for JSON HTTP APIs

use super::rate_limit::RateLimiter;
use crate::config::HttpSourceConfig;
use crate::error::{Error, Result};
use crate::fetch::{Page, PageFetcher};
use crate::pagination::{self, extract_path, Paginator};
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// Fetches pages of JSON records with GET requests
///
/// Each request carries, in increasing precedence, the source's static
/// params, the query passed to the loader and the paginator's params. The
/// next offset comes from the paginator combined with the source's stop
/// condition.
pub struct HttpPageFetcher {
    client: Client,
    url: Url,
    source: HttpSourceConfig,
    paginator: Box<dyn Paginator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpPageFetcher {
    /// Create a fetcher with its own HTTP client
    pub fn new(source: HttpSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(source.timeout())
            .user_agent(format!("pageflow/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(source, client)
    }

    /// Create a fetcher sharing an existing client
    pub fn with_client(source: HttpSourceConfig, client: Client) -> Result<Self> {
        source.validate()?;
        let url = source.url()?;
        let paginator = source.pagination.build();
        let rate_limiter = source.rate_limit.as_ref().map(RateLimiter::new);
        Ok(Self {
            client,
            url,
            source,
            paginator,
            rate_limiter,
        })
    }

    /// Source settings
    pub fn source(&self) -> &HttpSourceConfig {
        &self.source
    }

    /// Request URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Offset of the first page
    pub fn initial_offset(&self) -> u64 {
        self.paginator.initial_offset()
    }

    fn request_params(&self, query: &StringMap, offset: u64) -> StringMap {
        let mut params = self.source.params.clone();
        params.extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
        params.extend(self.paginator.query_params(offset));
        params
    }

    fn timeout_error(&self) -> Error {
        Error::Timeout {
            timeout_ms: self.source.timeout_ms,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    type Query = StringMap;
    type Item = JsonValue;

    async fn fetch_page(&self, query: &StringMap, offset: u64) -> Result<Page<JsonValue>> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let params = self.request_params(query, offset);
        let mut request = self.client.get(self.url.clone()).query(&params);
        for (key, value) in &self.source.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        request = request.timeout(self.source.timeout());

        debug!(url = %self.url, offset, "Fetching page");
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), offset, "Page request failed");
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body: JsonValue = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                Error::Http(e)
            }
        })?;
        let items = extract_records(&body, self.source.records_path.as_deref())?;
        let next = pagination::next_offset(
            self.paginator.as_ref(),
            &self.source.stop_condition,
            &body,
            offset,
            items.len(),
        );

        debug!(offset, records = items.len(), next = %next, "Page fetched");
        Ok(Page::new(items, next))
    }
}

impl std::fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("url", &self.url.as_str())
            .field("pagination", &self.source.pagination)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Pull the records array out of a response body
///
/// A `null` at the path is an empty page.
pub fn extract_records(body: &JsonValue, records_path: Option<&str>) -> Result<Vec<JsonValue>> {
    let path = records_path.unwrap_or("$");
    let value = extract_path(body, path)
        .ok_or_else(|| Error::extraction(path, "path not found in response"))?;

    match value {
        JsonValue::Array(items) => Ok(items.clone()),
        JsonValue::Null => Ok(Vec::new()),
        other => Err(Error::extraction(
            path,
            format!("expected an array, found {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
