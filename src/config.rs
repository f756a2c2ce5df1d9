//! Configuration types
//!
//! Loader, refresh and HTTP source settings loaded from YAML or JSON.
//!
//! ```yaml
//! loader:
//!   load_more_failure: keep_offset
//! polling:
//!   interval_ms: 60000
//! source:
//!   base_url: https://api.example.com
//!   path: /v1/users
//!   records_path: data
//!   pagination:
//!     type: offset
//!     limit: 50
//! ```

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::pagination::{PaginationConfig, StopCondition};
use crate::paging::LoaderConfig;
use crate::polling::PollingConfig;
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page loader settings
    pub loader: LoaderConfig,

    /// Periodic refresh settings
    pub polling: PollingConfig,

    /// HTTP data source, if paging an HTTP API
    pub source: Option<HttpSourceConfig>,
}

impl Config {
    /// Create a default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config file; `.json` files are read as JSON,
    /// everything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_ms == 0 {
            return Err(Error::invalid_value(
                "polling.interval_ms",
                "must be greater than zero",
            ));
        }
        if let Some(source) = &self.source {
            source.validate()?;
        }
        Ok(())
    }

    /// Loader settings adjusted to the source's first page
    ///
    /// Page-number sources starting at page 1 need the loader to start there
    /// too; an explicit `loader.initial_offset` wins when it is larger.
    pub fn loader_config(&self) -> LoaderConfig {
        let mut loader = self.loader.clone();
        if let Some(source) = &self.source {
            loader.initial_offset = loader.initial_offset.max(source.initial_offset());
        }
        loader
    }

    /// Set the loader config
    #[must_use]
    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    /// Set the polling config
    #[must_use]
    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Set the HTTP source
    #[must_use]
    pub fn with_source(mut self, source: HttpSourceConfig) -> Self {
        self.source = Some(source);
        self
    }
}

// ============================================================================
// HTTP Source Config
// ============================================================================

/// HTTP API paged by `HttpPageFetcher`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// Base URL for requests
    pub base_url: String,

    /// Path appended to the base URL
    #[serde(default)]
    pub path: String,

    /// Dot path to the records array; the body itself when unset
    #[serde(default)]
    pub records_path: Option<String>,

    /// Pagination strategy
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Extra condition ending pagination
    #[serde(default)]
    pub stop_condition: StopCondition,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Query parameters sent with every request
    #[serde(default)]
    pub params: StringMap,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl HttpSourceConfig {
    /// Create a source with default pagination
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: String::new(),
            records_path: None,
            pagination: PaginationConfig::default(),
            stop_condition: StopCondition::default(),
            headers: StringMap::new(),
            params: StringMap::new(),
            timeout_ms: default_timeout_ms(),
            rate_limit: None,
        }
    }

    /// Set the request path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the records path
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Set the pagination strategy
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Set the stop condition
    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a static query parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the rate limit
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimiterConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full request URL
    pub fn url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        if self.path.is_empty() {
            return Ok(base);
        }
        // Join relative to the base path rather than replacing its last segment.
        let base = if base.path().ends_with('/') {
            base
        } else {
            let mut with_slash = base.clone();
            with_slash.set_path(&format!("{}/", base.path()));
            with_slash
        };
        Ok(base.join(self.path.trim_start_matches('/'))?)
    }

    /// Offset of the first page
    pub fn initial_offset(&self) -> u64 {
        self.pagination.build().initial_offset()
    }

    /// Check the source settings
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("source.base_url"));
        }
        self.url()?;

        if self.timeout_ms == 0 {
            return Err(Error::invalid_value(
                "source.timeout_ms",
                "must be greater than zero",
            ));
        }

        match &self.pagination {
            PaginationConfig::Offset { limit: 0, .. } => {
                return Err(Error::invalid_value(
                    "source.pagination.limit",
                    "must be greater than zero",
                ));
            }
            PaginationConfig::PageNumber {
                page_size_param: Some(_),
                page_size: None,
                ..
            } => {
                return Err(Error::missing_field("source.pagination.page_size"));
            }
            _ => {}
        }

        if let Some(rate_limit) = &self.rate_limit {
            if rate_limit.requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "source.rate_limit.requests_per_second",
                    "must be greater than zero",
                ));
            }
        }

        Ok(())
    }
}
