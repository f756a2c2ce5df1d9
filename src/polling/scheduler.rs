//! Tokio-backed scheduler

use super::types::{CancelHandle, Scheduler};
use crate::error::{Error, Result};
use std::time::Duration;
use tokio::runtime::Handle;

/// Scheduler running callbacks on a tokio runtime after a sleep
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Bind to the current runtime
    pub fn new() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime {
            message: e.to_string(),
        })?;
        Ok(Self { runtime })
    }

    /// Bind to an explicit runtime handle
    pub fn with_runtime(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce() + Send>,
    ) -> CancelHandle {
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        CancelHandle::new(move || task.abort())
    }
}
