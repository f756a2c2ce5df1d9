//! Paging module
//!
//! The page loader: one in-flight fetch at a time, superseded fetches are
//! cancelled, and every transition is published as a `PagingState` snapshot.
//!
//! # Overview
//!
//! - `PageLoader` - `load`, `load_more`, `reset`, periodic refresh
//! - `PagingState` - snapshot of request kind, offset, status, page data and error
//! - `RequestHandle` - awaitable outcome of one `load`/`load_more` call
//! - `LoaderConfig` - initial offset and load-more failure policy

mod loader;
mod refresh;
mod types;

pub use loader::{ObserverId, PageLoader};
pub use types::{LoadMoreFailurePolicy, LoaderConfig, PagingState, RequestHandle, RequestOutcome};
