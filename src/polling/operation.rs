//! Async closure adapter for poll units

use super::process::Completion;
use super::types::{CancelHandle, PollOperation};
use crate::error::{Error, Result};
use std::future::Future;
use tokio::runtime::Handle;

/// Poll unit running an async closure on a tokio runtime
///
/// Cancelling the unit aborts the spawned task.
pub struct AsyncOperation<F> {
    f: F,
    runtime: Handle,
}

impl<F, Fut> AsyncOperation<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    /// Wrap a closure, spawning onto the current runtime
    pub fn new(f: F) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime {
            message: e.to_string(),
        })?;
        Ok(Self::with_runtime(f, runtime))
    }

    /// Wrap a closure, spawning onto the given runtime
    pub fn with_runtime(f: F, runtime: Handle) -> Self {
        Self { f, runtime }
    }
}

impl<F, Fut> PollOperation for AsyncOperation<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn perform_one(&self, completion: Completion) -> CancelHandle {
        let unit = (self.f)();
        let task = self.runtime.spawn(async move {
            unit.await;
            completion.complete();
        });
        CancelHandle::new(move || task.abort())
    }
}

impl<F> std::fmt::Debug for AsyncOperation<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncOperation").finish_non_exhaustive()
    }
}
