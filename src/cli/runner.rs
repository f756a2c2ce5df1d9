//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::collection::PageListCollection;
use crate::config::{Config, HttpSourceConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpPageFetcher;
use crate::paging::{PageLoader, RequestOutcome};
use crate::types::StringMap;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Validate => self.validate(),
            Commands::Fetch { max_pages, params } => self.fetch(*max_pages, params).await,
            Commands::Poll {
                ticks,
                interval_ms,
                params,
            } => self.poll(*ticks, *interval_ms, params).await,
        }
    }

    fn load_config(&self) -> Result<Config> {
        let config = Config::from_file(&self.cli.config)?;
        debug!(path = %self.cli.config.display(), "Loaded configuration");
        Ok(config)
    }

    fn source(config: &Config) -> Result<HttpSourceConfig> {
        config
            .source
            .clone()
            .ok_or_else(|| Error::missing_field("source"))
    }

    fn fetcher(config: &Config) -> Result<HttpPageFetcher> {
        let source = Self::source(config)?;
        let base_url = source.base_url.clone();
        HttpPageFetcher::new(source).with_context(|| format!("source '{base_url}'"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        let source = config.source.as_ref().map(|source| {
            json!({
                "url": source.url().map(|u| u.to_string()).unwrap_or_default(),
                "pagination": source.pagination,
                "stop_condition": source.stop_condition,
            })
        });

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Configuration '{}' is valid", self.cli.config.display()),
            },
            "config": {
                "loader": config.loader_config(),
                "polling": config.polling,
                "source": source,
            }
        }));
        Ok(())
    }

    /// Page through the source and print every record
    async fn fetch(&self, max_pages: Option<usize>, params: &[String]) -> Result<()> {
        let config = self.load_config()?;
        let query = parse_params(params).context("--param")?;
        let fetcher = Self::fetcher(&config)?;
        let loader = PageLoader::with_config(fetcher, config.loader_config())?;
        let collection = PageListCollection::bind(&loader);

        let mut pages = 0usize;
        let mut outcome = loader.load(query.clone()).finished().await;
        while outcome == RequestOutcome::Succeeded {
            pages += 1;
            if max_pages.is_some_and(|max| pages >= max) || !loader.state().has_more() {
                break;
            }
            outcome = loader.load_more(query.clone()).finished().await;
        }

        let list = collection.snapshot();
        for record in list.items() {
            self.output_message(&json!({ "type": "RECORD", "record": record }));
        }
        self.output_message(&json!({
            "type": "STATE",
            "state": {
                "pages": pages,
                "records": list.len(),
                "status": list.status(),
                "offset": loader.pagination().get(),
            }
        }));
        info!(pages, records = list.len(), "Fetch finished");

        match list.error() {
            Some(error) => Err(Error::fetch(error.to_string())),
            None => Ok(()),
        }
    }

    /// Refresh the first page periodically
    async fn poll(&self, ticks: u64, interval_ms: Option<u64>, params: &[String]) -> Result<()> {
        let config = self.load_config()?;
        let query = parse_params(params).context("--param")?;
        let mut polling = config.polling.clone();
        if let Some(interval_ms) = interval_ms {
            polling = polling.with_interval(Duration::from_millis(interval_ms));
        }

        let fetcher = Self::fetcher(&config)?;
        let loader = PageLoader::with_config(fetcher, config.loader_config())?;
        let collection = PageListCollection::bind(&loader);
        let mut rx = collection.subscribe();

        loader.start_refresh(query, &polling);
        let mut tick = 0u64;
        while tick < ticks {
            rx.changed()
                .await
                .map_err(|_| Error::Other("collection closed".to_string()))?;
            let list = rx.borrow_and_update().clone();
            if !list.status().is_finished() {
                continue;
            }
            tick += 1;
            self.output_message(&json!({
                "type": "REFRESH",
                "refresh": {
                    "tick": tick,
                    "status": list.status(),
                    "records": list.len(),
                    "offset": list.offset(),
                    "error": list.error().map(ToString::to_string),
                }
            }));
        }
        loader.stop_refresh();
        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Parse `key=value` pairs into a query map
pub fn parse_params(params: &[String]) -> Result<StringMap> {
    params
        .iter()
        .map(|param| {
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| Error::invalid_value("param", format!("expected KEY=VALUE, got '{param}'")))?;
            if key.is_empty() {
                return Err(Error::invalid_value("param", format!("empty key in '{param}'")));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
