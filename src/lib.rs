// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pageflow
//!
//! Paginated data loading with reactive state.
//!
//! A [`PageLoader`] pages through any [`PageFetcher`], publishing every
//! transition as a [`PagingState`]. Collections fold those states into one
//! ordered list, and a polling process can refresh the first page on an
//! interval.
//!
//! ## Features
//!
//! - **Supersession**: a new `load` or `load_more` aborts the fetch in flight; stale results never publish
//! - **Offset tracking**: `PageOffset::Completed` ends pagination; local list edits shift the offset
//! - **Reactive state**: replay-last `watch` subscriptions, streams and ordered observers
//! - **Periodic refresh**: stoppable polling with a pluggable scheduler
//! - **HTTP source**: offset and page-number APIs with stop conditions and rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pageflow::{HttpPageFetcher, HttpSourceConfig, PageListCollection, PageLoader, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = HttpSourceConfig::new("https://api.example.com").with_path("users");
//!     let loader = PageLoader::new(HttpPageFetcher::new(source)?)?;
//!     let users = PageListCollection::bind(&loader);
//!
//!     loader.load(Default::default()).finished().await;
//!     loader.load_more(Default::default()).finished().await;
//!     println!("{} users", users.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  fetch_page   ┌──────────────┐  PagingState  ┌──────────────────┐
//! │ PageFetcher  │◄──────────────│  PageLoader  │──────────────►│ PageListCollection│
//! │ (HTTP, fn)   │──────────────►│  Pagination  │◄──────────────│  insert / remove  │
//! └──────────────┘     Page      └──────▲───────┘ offset ±1     └──────────────────┘
//!                                       │ load
//!                                ┌──────┴───────┐
//!                                │PollingProcess│
//!                                └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration loading
pub mod config;

/// Single-value async loading state
pub mod loading;

/// Offset tracking and pagination strategies
pub mod pagination;

/// Page fetcher trait
pub mod fetch;

/// Paginated loader
pub mod paging;

/// Lists accumulated from loader states
pub mod collection;

/// Periodic polling
pub mod polling;

/// HTTP page source
pub mod http;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::*;

pub use collection::{MutablePageListCollection, PageList, PageListCollection};
pub use config::{Config, HttpSourceConfig};
pub use fetch::{fetcher_fn, Page, PageFetcher};
pub use http::HttpPageFetcher;
pub use loading::{AsyncLoader, LoadingState};
pub use pagination::{PageOffset, Pagination, PaginationConfig, StopCondition};
pub use paging::{LoaderConfig, PageLoader, PagingState, RequestHandle, RequestOutcome};
pub use polling::{PollingConfig, PollingProcess};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
