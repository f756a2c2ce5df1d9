//! HTTP source module
//!
//! Pages JSON HTTP APIs through the `PageFetcher` trait.
//!
//! # Features
//!
//! - **Pagination**: offset/limit or page-number parameters from `PaginationConfig`
//! - **Stop conditions**: end pagination on a body field or a total count
//! - **Rate limiting**: token bucket limiter using governor

mod fetcher;
mod rate_limit;

pub use fetcher::{extract_records, HttpPageFetcher};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
