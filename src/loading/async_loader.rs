//! Single-value async loader
//!
//! Runs one future at a time and publishes its progress as a `LoadingState`.
//! A new `run` supersedes the previous one: the old task is aborted and its
//! result, should it still arrive, is discarded by generation check.

use super::types::LoadingState;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Published state of an [`AsyncLoader`]
pub type AsyncState<T> = LoadingState<T, Arc<Error>>;

struct Slot {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

struct Inner<T> {
    slot: Mutex<Slot>,
    tx: watch::Sender<AsyncState<T>>,
}

/// Loader for a single asynchronous value
pub struct AsyncLoader<T> {
    inner: Arc<Inner<T>>,
    runtime: Handle,
}

impl<T> AsyncLoader<T>
where
    T: Send + Sync + 'static,
{
    /// Create a loader bound to the current tokio runtime
    pub fn new() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime {
            message: e.to_string(),
        })?;
        Ok(Self::with_runtime(runtime))
    }

    /// Create a loader that spawns onto the given runtime
    pub fn with_runtime(runtime: Handle) -> Self {
        let (tx, _) = watch::channel(LoadingState::Initial);
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot {
                    generation: 0,
                    task: None,
                }),
                tx,
            }),
            runtime,
        }
    }

    /// Start loading, superseding any run still in flight
    pub fn run<Fut>(&self, future: Fut)
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut slot = self.inner.slot.lock();
        slot.generation += 1;
        let generation = slot.generation;
        if let Some(task) = slot.task.take() {
            debug!(generation, "Superseding in-flight load");
            task.abort();
        }
        self.inner.tx.send_replace(LoadingState::Loading);

        let inner = Arc::clone(&self.inner);
        slot.task = Some(self.runtime.spawn(async move {
            let result = future.await;
            let mut slot = inner.slot.lock();
            if slot.generation != generation {
                trace!(generation, "Discarding stale load result");
                return;
            }
            slot.task = None;
            match result {
                Ok(value) => {
                    inner.tx.send_replace(LoadingState::Success(value));
                }
                Err(e) if e.is_cancelled() => {
                    debug!(generation, "Load cancelled");
                }
                Err(e) => {
                    debug!(generation, error = %e, "Load failed");
                    inner.tx.send_replace(LoadingState::Failure(Arc::new(e)));
                }
            }
        }));
    }

    /// Cancel any in-flight run and return to `Initial`
    pub fn reset(&self) {
        let mut slot = self.inner.slot.lock();
        slot.generation += 1;
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        self.inner.tx.send_replace(LoadingState::Initial);
    }

    /// Subscribe to state changes; the current state is seen immediately
    pub fn subscribe(&self) -> watch::Receiver<AsyncState<T>> {
        self.inner.tx.subscribe()
    }
}

impl<T> AsyncLoader<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Current state snapshot
    pub fn state(&self) -> AsyncState<T> {
        self.inner.tx.borrow().clone()
    }
}

impl<T> Drop for AsyncLoader<T> {
    fn drop(&mut self) {
        if let Some(task) = self.inner.slot.lock().task.take() {
            task.abort();
        }
    }
}

impl<T> std::fmt::Debug for AsyncLoader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncLoader")
            .field("generation", &self.inner.slot.lock().generation)
            .finish_non_exhaustive()
    }
}
