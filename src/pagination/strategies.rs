//! Pagination strategy implementations
//!
//! Each strategy maps the tracked offset onto request parameters and decides
//! the offset that follows a page.

use super::types::{PageOffset, Paginator};
use crate::types::StringMap;
use std::collections::HashMap;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination (e.g., SQL-style pagination)
///
/// The tracked offset counts records. Common patterns:
/// - `?offset=100&limit=50`
/// - `?skip=100&take=50`
///
/// A page shorter than `limit` ends pagination.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Number of records per page
    pub limit: u32,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(offset_param: impl Into<String>, limit_param: impl Into<String>, limit: u32) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit,
        }
    }
}

impl Paginator for OffsetPaginator {
    fn initial_offset(&self) -> u64 {
        0
    }

    fn query_params(&self, offset: u64) -> StringMap {
        let mut params = HashMap::new();
        params.insert(self.offset_param.clone(), offset.to_string());
        params.insert(self.limit_param.clone(), self.limit.to_string());
        params
    }

    fn next_offset(&self, offset: u64, records_count: usize) -> PageOffset {
        if records_count == 0 || records_count < self.limit as usize {
            return PageOffset::Completed;
        }
        PageOffset::Available(offset + records_count as u64)
    }

    fn records_before(&self, offset: u64) -> u64 {
        offset
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination (e.g., traditional web pagination)
///
/// The tracked offset is the page number. Common patterns:
/// - `?page=2`
/// - `?page=2&per_page=50`
///
/// An empty page always ends pagination; with a page size, so does a short one.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    /// First page number (usually 0 or 1)
    pub start_page: u32,
    /// Optional page size parameter name
    pub page_size_param: Option<String>,
    /// Page size value
    pub page_size: Option<u32>,
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(page_param: impl Into<String>, start_page: u32) -> Self {
        Self {
            page_param: page_param.into(),
            start_page,
            page_size_param: None,
            page_size: None,
        }
    }

    /// Set page size parameter
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = Some(size);
        self
    }
}

impl Paginator for PageNumberPaginator {
    fn initial_offset(&self) -> u64 {
        u64::from(self.start_page)
    }

    fn query_params(&self, offset: u64) -> StringMap {
        let mut params = HashMap::new();
        params.insert(self.page_param.clone(), offset.to_string());
        if let (Some(param), Some(size)) = (&self.page_size_param, self.page_size) {
            params.insert(param.clone(), size.to_string());
        }
        params
    }

    fn next_offset(&self, offset: u64, records_count: usize) -> PageOffset {
        if records_count == 0 {
            return PageOffset::Completed;
        }
        if let Some(size) = self.page_size {
            if records_count < size as usize {
                return PageOffset::Completed;
            }
        }
        PageOffset::Available(offset + 1)
    }

    fn records_before(&self, offset: u64) -> u64 {
        let pages = offset.saturating_sub(u64::from(self.start_page));
        pages * u64::from(self.page_size.unwrap_or(0))
    }
}
