//! Pagination types and traits
//!
//! Defines the offset model and the pagination strategy abstraction.

use super::strategies::{OffsetPaginator, PageNumberPaginator};
use crate::types::{JsonValue, StringMap};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Page Offset
// ============================================================================

/// Position of the next page to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOffset {
    /// More pages may exist starting at this offset
    Available(u64),
    /// No further pages
    Completed,
}

impl Default for PageOffset {
    fn default() -> Self {
        Self::Available(0)
    }
}

impl PageOffset {
    /// Numeric offset, `None` once completed
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Available(offset) => Some(*offset),
            Self::Completed => None,
        }
    }

    /// Check if another page can be requested
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Check if pagination is exhausted
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Advance the offset; no-op once completed
    pub fn increment(&mut self, by: u64) {
        if let Self::Available(offset) = self {
            *offset = offset.saturating_add(by);
        }
    }

    /// Move the offset back, saturating at zero; no-op once completed
    pub fn decrement(&mut self, by: u64) {
        if let Self::Available(offset) = self {
            *offset = offset.saturating_sub(by);
        }
    }

    /// Replace the numeric offset; no-op once completed
    pub fn update(&mut self, to: u64) {
        if let Self::Available(offset) = self {
            *offset = to;
        }
    }
}

impl std::fmt::Display for PageOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(offset) => write!(f, "available({offset})"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

// ============================================================================
// Pagination Cell
// ============================================================================

/// Shared, mutable offset cell
///
/// Clones share the same offset. The loader stores the offset returned by each
/// page; list mutations nudge it so the next server page lines up with what
/// the client already holds.
#[derive(Debug, Clone)]
pub struct Pagination {
    offset: Arc<Mutex<PageOffset>>,
    initial: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Pagination {
    /// Create a cell starting at the given offset
    pub fn new(initial: u64) -> Self {
        Self {
            offset: Arc::new(Mutex::new(PageOffset::Available(initial))),
            initial,
        }
    }

    /// Offset a fresh load starts from
    pub fn initial(&self) -> u64 {
        self.initial
    }

    /// Current offset
    pub fn get(&self) -> PageOffset {
        *self.offset.lock()
    }

    /// Overwrite the offset, including with `Completed`
    pub fn set(&self, offset: PageOffset) {
        *self.offset.lock() = offset;
    }

    /// Return to the initial offset (the only way out of `Completed`)
    pub fn reset(&self) {
        self.set(PageOffset::Available(self.initial));
    }

    /// Mark pagination as exhausted
    pub fn complete(&self) {
        self.set(PageOffset::Completed);
    }

    /// Store the offset after a page fetched from `started`, keeping local edits
    ///
    /// Increments and decrements applied since the fetch started are carried
    /// over to `next`, so records inserted or removed while the page was in
    /// flight still line up with the server. Returns the stored offset.
    pub fn advance_from(&self, started: u64, next: PageOffset) -> PageOffset {
        let mut offset = self.offset.lock();
        let mut adjusted = next;
        if let PageOffset::Available(current) = *offset {
            if current >= started {
                adjusted.increment(current - started);
            } else {
                adjusted.decrement(started - current);
            }
        }
        *offset = adjusted;
        adjusted
    }

    /// See [`PageOffset::increment`]
    pub fn increment(&self, by: u64) {
        self.offset.lock().increment(by);
    }

    /// See [`PageOffset::decrement`]
    pub fn decrement(&self, by: u64) {
        self.offset.lock().decrement(by);
    }

    /// See [`PageOffset::update`]
    pub fn update(&self, to: u64) {
        self.offset.lock().update(to);
    }
}

// ============================================================================
// Pagination Strategies
// ============================================================================

/// Configuration for pagination behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationConfig {
    /// Offset/limit pagination; the offset counts records
    Offset {
        /// Query parameter name for offset
        #[serde(default = "default_offset_param")]
        offset_param: String,
        /// Query parameter name for limit
        #[serde(default = "default_limit_param")]
        limit_param: String,
        /// Number of records per page
        limit: u32,
    },

    /// Page number pagination; the offset is the page index
    PageNumber {
        /// Query parameter name for page number
        #[serde(default = "default_page_param")]
        page_param: String,
        /// First page number (usually 0 or 1)
        #[serde(default)]
        start_page: u32,
        /// Optional page size parameter name
        #[serde(default)]
        page_size_param: Option<String>,
        /// Page size value
        #[serde(default)]
        page_size: Option<u32>,
    },
}

fn default_offset_param() -> String {
    "offset".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::offset(20)
    }
}

impl PaginationConfig {
    /// Offset pagination with default parameter names
    pub fn offset(limit: u32) -> Self {
        Self::Offset {
            offset_param: default_offset_param(),
            limit_param: default_limit_param(),
            limit,
        }
    }

    /// Page number pagination with default parameter name
    pub fn page_number(start_page: u32) -> Self {
        Self::PageNumber {
            page_param: default_page_param(),
            start_page,
            page_size_param: None,
            page_size: None,
        }
    }

    /// Build the strategy this config describes
    pub fn build(&self) -> Box<dyn Paginator> {
        match self {
            Self::Offset {
                offset_param,
                limit_param,
                limit,
            } => Box::new(OffsetPaginator::new(
                offset_param.clone(),
                limit_param.clone(),
                *limit,
            )),
            Self::PageNumber {
                page_param,
                start_page,
                page_size_param,
                page_size,
            } => {
                let mut paginator = PageNumberPaginator::new(page_param.clone(), *start_page);
                if let (Some(param), Some(size)) = (page_size_param, page_size) {
                    paginator = paginator.with_page_size(param.clone(), *size);
                }
                Box::new(paginator)
            }
        }
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Offset a fresh load starts from
    fn initial_offset(&self) -> u64;

    /// Query parameters selecting the page at `offset`
    fn query_params(&self, offset: u64) -> StringMap;

    /// Offset following the page at `offset` that returned `records_count` records
    fn next_offset(&self, offset: u64, records_count: usize) -> PageOffset;

    /// Records known to precede the page at `offset`
    fn records_before(&self, offset: u64) -> u64;
}

// ============================================================================
// Stop Conditions
// ============================================================================

/// Stop conditions evaluated against a page response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopCondition {
    /// Only the strategy decides (short or empty page)
    #[default]
    None,

    /// Stop when a field has a specific value
    Field {
        /// Dot path to the field
        path: String,
        /// Value that ends pagination
        value: JsonValue,
    },

    /// Stop when records fetched so far reach a total count field
    TotalCount {
        /// Dot path to the total count field
        path: String,
    },
}

impl StopCondition {
    /// Create a field-based stop condition
    pub fn field(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::Field {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Create a total count stop condition
    pub fn total_count(path: impl Into<String>) -> Self {
        Self::TotalCount { path: path.into() }
    }
}

/// Result of checking a stop condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Continue pagination
    Continue,
    /// Stop pagination
    Stop,
}

/// Check a stop condition against a response body
pub fn check_stop_condition(
    condition: &StopCondition,
    body: &JsonValue,
    fetched_so_far: u64,
) -> StopResult {
    match condition {
        StopCondition::None => StopResult::Continue,
        StopCondition::Field { path, value } => match extract_path(body, path) {
            Some(found) if found == value => StopResult::Stop,
            _ => StopResult::Continue,
        },
        StopCondition::TotalCount { path } => {
            let total = extract_path(body, path).and_then(|v| match v {
                JsonValue::Number(n) => n.as_u64(),
                JsonValue::String(s) => s.parse::<u64>().ok(),
                _ => None,
            });
            match total {
                Some(total) if fetched_so_far >= total => StopResult::Stop,
                _ => StopResult::Continue,
            }
        }
    }
}

/// Combine a strategy and a stop condition into the offset after a page
pub fn next_offset(
    paginator: &dyn Paginator,
    condition: &StopCondition,
    body: &JsonValue,
    offset: u64,
    records_count: usize,
) -> PageOffset {
    let fetched = paginator.records_before(offset) + records_count as u64;
    if check_stop_condition(condition, body, fetched) == StopResult::Stop {
        return PageOffset::Completed;
    }
    paginator.next_offset(offset, records_count)
}

/// Walk a dot path (`$.a.b` or `a.b`) through nested objects
pub(crate) fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
