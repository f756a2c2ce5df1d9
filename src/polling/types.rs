//! Polling types and traits

use super::process::Completion;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One-shot cancellation hook
///
/// Dropping a handle does not cancel; call [`CancelHandle::cancel`].
pub struct CancelHandle {
    hook: Option<Box<dyn FnOnce() + Send>>,
}

impl CancelHandle {
    /// Wrap a cancellation hook
    pub fn new(hook: impl FnOnce() + Send + 'static) -> Self {
        Self {
            hook: Some(Box::new(hook)),
        }
    }

    /// Handle whose cancellation does nothing
    pub fn noop() -> Self {
        Self { hook: None }
    }

    /// Run the cancellation hook
    pub fn cancel(mut self) {
        if let Some(hook) = self.hook.take() {
            hook();
        }
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("armed", &self.hook.is_some())
            .finish()
    }
}

/// Unit of recurring work
pub trait PollOperation: Send + Sync + 'static {
    /// Start one unit; call `completion.complete()` when it is done
    ///
    /// The returned handle is cancelled if the process stops while the unit
    /// is still running.
    fn perform_one(&self, completion: Completion) -> CancelHandle;
}

/// Timer primitive
pub trait Scheduler: Send + Sync + 'static {
    /// Run `callback` once after `delay` unless the returned handle is cancelled
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>)
        -> CancelHandle;
}

/// Configuration for periodic polling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval between the end of one unit and the start of the next
    pub interval_ms: u64,
    /// Run the first unit on start instead of after one interval
    pub immediately: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            immediately: true,
        }
    }
}

impl PollingConfig {
    /// Create a new polling config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interval
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set whether the first unit runs on start
    #[must_use]
    pub fn with_immediately(mut self, immediately: bool) -> Self {
        self.immediately = immediately;
        self
    }

    /// Interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
