//! Common types used throughout pageflow
//!
//! This module contains shared type definitions, type aliases,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Request Kind
// ============================================================================

/// Which operation produced a paging state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Fresh load from the initial offset; success replaces the list
    #[default]
    Load,
    /// Next page at the current offset; success appends to the list
    LoadMore,
}

impl RequestKind {
    /// Check if this is a fresh load
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load)
    }

    /// Check if this is a load-more request
    pub fn is_load_more(&self) -> bool {
        matches!(self, Self::LoadMore)
    }
}

// ============================================================================
// Paging Status
// ============================================================================

/// Status of the most recent paging request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagingStatus {
    /// Nothing requested yet (or reset)
    #[default]
    Initial,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Success,
    /// The last fetch failed
    Failure,
}

impl PagingStatus {
    /// Check if a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the last request reached a terminal status
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl std::fmt::Display for PagingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Initial => "initial",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Failure => "failure",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_default() {
        assert_eq!(RequestKind::default(), RequestKind::Load);
        assert!(RequestKind::Load.is_load());
        assert!(RequestKind::LoadMore.is_load_more());
    }

    #[test]
    fn test_paging_status_predicates() {
        assert!(PagingStatus::Loading.is_loading());
        assert!(!PagingStatus::Initial.is_finished());
        assert!(PagingStatus::Success.is_finished());
        assert!(PagingStatus::Failure.is_finished());
    }

    #[test]
    fn test_paging_status_serde() {
        let json = serde_json::to_string(&PagingStatus::Failure).unwrap();
        assert_eq!(json, "\"failure\"");
        let kind: RequestKind = serde_json::from_str("\"load_more\"").unwrap();
        assert_eq!(kind, RequestKind::LoadMore);
        assert_eq!(PagingStatus::Loading.to_string(), "loading");
    }
}
