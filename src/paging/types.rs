//! Paging types
//!
//! Snapshot, request outcome and configuration types for the page loader.

use crate::error::Error;
use crate::loading::LoadingState;
use crate::pagination::PageOffset;
use crate::types::{PagingStatus, RequestKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;

// ============================================================================
// Paging State
// ============================================================================

/// Snapshot published on every loader transition
#[derive(Debug, Clone)]
pub struct PagingState<T> {
    /// Operation that produced this state
    pub request: RequestKind,
    /// Offset of the next page
    pub offset: PageOffset,
    /// Status of the operation
    pub status: PagingStatus,
    /// Records of the most recent page
    ///
    /// Empty while a fresh `load` is in flight; a `load_more` keeps the
    /// previous page until its own page arrives.
    pub data: Vec<T>,
    /// Set exactly when `status` is `Failure`
    pub error: Option<Arc<Error>>,
}

impl<T> PagingState<T> {
    /// State of a loader that has not loaded anything
    pub fn initial(offset: PageOffset) -> Self {
        Self {
            request: RequestKind::Load,
            offset,
            status: PagingStatus::Initial,
            data: Vec::new(),
            error: None,
        }
    }

    /// Check if a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Check if the last request succeeded
    pub fn is_success(&self) -> bool {
        self.status == PagingStatus::Success
    }

    /// Check if the last request failed
    pub fn is_failure(&self) -> bool {
        self.status == PagingStatus::Failure
    }

    /// Check if more pages can be requested
    pub fn has_more(&self) -> bool {
        self.offset.is_available()
    }
}

impl<T: Clone> PagingState<T> {
    /// View this snapshot as a plain loading state
    pub fn loading_state(&self) -> LoadingState<Vec<T>, Arc<Error>> {
        match (self.status, &self.error) {
            (PagingStatus::Initial, _) => LoadingState::Initial,
            (PagingStatus::Loading, _) => LoadingState::Loading,
            (PagingStatus::Success, _) => LoadingState::Success(self.data.clone()),
            (PagingStatus::Failure, Some(error)) => LoadingState::Failure(Arc::clone(error)),
            (PagingStatus::Failure, None) => {
                LoadingState::Failure(Arc::new(Error::fetch("unknown failure")))
            }
        }
    }
}

impl<T> Default for PagingState<T> {
    fn default() -> Self {
        Self::initial(PageOffset::default())
    }
}

// ============================================================================
// Request Outcome
// ============================================================================

/// How a `load`/`load_more` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The page was fetched and published
    Succeeded,
    /// The fetch failed and the failure was published
    Failed,
    /// A newer request or a reset replaced this one; nothing was published
    Superseded,
    /// The request was not started because pagination is completed
    Skipped,
}

impl RequestOutcome {
    /// Check if this request's result reached the published state
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Awaitable outcome of a single request
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct RequestHandle {
    rx: Option<oneshot::Receiver<RequestOutcome>>,
}

impl RequestHandle {
    pub(crate) fn pending(rx: oneshot::Receiver<RequestOutcome>) -> Self {
        Self { rx: Some(rx) }
    }

    pub(crate) fn skipped() -> Self {
        Self { rx: None }
    }

    /// Check if the request was never started
    pub fn is_skipped(&self) -> bool {
        self.rx.is_none()
    }

    /// Wait for the request to finish
    pub async fn finished(self) -> RequestOutcome {
        match self.rx {
            None => RequestOutcome::Skipped,
            // The sender is dropped when the task is aborted.
            Some(rx) => rx.await.unwrap_or(RequestOutcome::Superseded),
        }
    }
}

// ============================================================================
// Loader Config
// ============================================================================

/// What a failed `load_more` does to the offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMoreFailurePolicy {
    /// Mark pagination completed; further `load_more` calls are no-ops
    #[default]
    CompletePagination,
    /// Keep the offset so `load_more` can retry the same page
    KeepOffset,
}

/// Configuration for a page loader
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Offset every fresh `load` starts from
    pub initial_offset: u64,
    /// Offset handling after a failed `load_more`
    pub load_more_failure: LoadMoreFailurePolicy,
}

impl LoaderConfig {
    /// Create a new loader config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial offset
    #[must_use]
    pub fn with_initial_offset(mut self, offset: u64) -> Self {
        self.initial_offset = offset;
        self
    }

    /// Set the load-more failure policy
    #[must_use]
    pub fn with_load_more_failure(mut self, policy: LoadMoreFailurePolicy) -> Self {
        self.load_more_failure = policy;
        self
    }
}
