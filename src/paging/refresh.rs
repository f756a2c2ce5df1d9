//! Periodic refresh of a page loader

use super::loader::LoaderInner;
use crate::fetch::PageFetcher;
use crate::polling::{CancelHandle, Completion, PollOperation};
use crate::types::RequestKind;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::trace;

/// Poll unit issuing a fresh `load` and completing when it settles
pub(super) struct RefreshOperation<F: PageFetcher> {
    loader: Arc<LoaderInner<F>>,
    query: F::Query,
    runtime: Handle,
}

impl<F: PageFetcher> RefreshOperation<F> {
    pub(super) fn new(loader: Arc<LoaderInner<F>>, query: F::Query, runtime: Handle) -> Self {
        Self {
            loader,
            query,
            runtime,
        }
    }
}

impl<F: PageFetcher> PollOperation for RefreshOperation<F> {
    fn perform_one(&self, completion: Completion) -> CancelHandle {
        let request = self.loader.start(RequestKind::Load, self.query.clone());
        // Stopping the poll only stops waiting; the load itself stays owned by the loader.
        let waiter = self.runtime.spawn(async move {
            let outcome = request.finished().await;
            trace!(?outcome, "Refresh finished");
            completion.complete();
        });
        CancelHandle::new(move || waiter.abort())
    }
}
