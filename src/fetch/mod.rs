//! Page fetch module
//!
//! The capability the loader consumes to obtain one page of data.
//!
//! # Overview
//!
//! - `PageFetcher` - async `(query, offset) -> Page` trait implemented by data sources
//! - `Page` - the records of one page plus the offset that follows it
//! - `FnFetcher` - adapter turning an async closure into a `PageFetcher`

mod types;

pub use types::{fetcher_fn, FnFetcher, Page, PageFetcher};

#[cfg(test)]
mod tests;
