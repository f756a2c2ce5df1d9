//! Pagination module
//!
//! Offset tracking and next-offset strategies.
//!
//! # Overview
//!
//! - `PageOffset` - either an available numeric offset or the terminal `Completed`
//! - `Pagination` - shared offset cell adjusted by the loader and by local list edits
//! - `Paginator` - strategies computing query parameters and the next offset
//!   (`OffsetPaginator`, `PageNumberPaginator`)

mod strategies;
mod types;

pub use strategies::{OffsetPaginator, PageNumberPaginator};
pub use types::{
    check_stop_condition, next_offset, PageOffset, Pagination, PaginationConfig, Paginator,
    StopCondition, StopResult,
};
pub(crate) use types::extract_path;

#[cfg(test)]
mod tests;
