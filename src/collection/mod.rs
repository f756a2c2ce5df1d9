//! Page list collection module
//!
//! Folds the loader's `PagingState` transitions into one ordered list.
//!
//! # Overview
//!
//! - `PageList` - pure value plus `reduce`/`fold` over paging states
//! - `PageListCollection` - read-only list bound to a loader
//! - `MutablePageListCollection` - bound list with local insert/update/remove
//!   that keeps the loader's offset aligned

mod bound;
mod types;

pub use bound::{MutablePageListCollection, PageListCollection};
pub use types::PageList;
