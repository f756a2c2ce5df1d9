//! Page loader implementation
//!
//! All transitions happen under one mutex. Each started fetch carries the
//! generation current at its start; a completion whose generation is no
//! longer current is dropped without touching the published state.

use super::refresh::RefreshOperation;
use super::types::{LoadMoreFailurePolicy, LoaderConfig, PagingState, RequestHandle, RequestOutcome};
use crate::error::{Error, Result};
use crate::fetch::{Page, PageFetcher};
use crate::pagination::{PageOffset, Pagination};
use crate::polling::{PollingConfig, PollingProcess, TokioScheduler};
use crate::types::{PagingStatus, RequestKind};
use futures::stream::{self, Stream};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

type Observer<T> = Box<dyn Fn(&PagingState<T>) + Send + Sync>;

/// Identifies a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Core<T> {
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    /// Settled status to fall back to if a fetch reports cancellation
    resume: (PagingStatus, Option<Arc<Error>>),
    observers: Vec<(ObserverId, Observer<T>)>,
    next_observer: u64,
}

impl<T> Core<T> {
    fn fetch_in_flight(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn abort_in_flight(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}

/// What a started fetch needs to settle its completion
struct Ticket {
    generation: u64,
    kind: RequestKind,
    offset: u64,
    resume: (PagingStatus, Option<Arc<Error>>),
}

pub(super) struct LoaderInner<F: PageFetcher> {
    fetcher: F,
    config: LoaderConfig,
    runtime: Handle,
    pagination: Pagination,
    core: Mutex<Core<F::Item>>,
    tx: watch::Sender<PagingState<F::Item>>,
}

impl<F: PageFetcher> LoaderInner<F> {
    /// Publish a state to observers and subscribers; caller holds the core lock
    fn publish(&self, core: &Core<F::Item>, state: PagingState<F::Item>) {
        trace!(
            request = ?state.request,
            status = %state.status,
            offset = %state.offset,
            records = state.data.len(),
            "Paging transition"
        );
        for (_, observer) in &core.observers {
            observer(&state);
        }
        self.tx.send_replace(state);
    }

    pub(super) fn start(self: &Arc<Self>, kind: RequestKind, query: F::Query) -> RequestHandle {
        let mut core = self.core.lock();

        match kind {
            RequestKind::Load => {
                if core.fetch_in_flight() {
                    debug!(generation = core.generation, "Load supersedes in-flight fetch");
                }
                core.abort_in_flight();
                self.pagination.reset();
            }
            RequestKind::LoadMore => {
                let Some(offset) = self.pagination.get().value() else {
                    debug!("Skipping load_more: pagination completed");
                    return RequestHandle::skipped();
                };
                if core.fetch_in_flight() {
                    debug!(
                        generation = core.generation,
                        offset,
                        "Load more supersedes in-flight fetch"
                    );
                }
                core.abort_in_flight();
            }
        }

        let Some(offset) = self.pagination.get().value() else {
            return RequestHandle::skipped();
        };

        {
            let current = self.tx.borrow();
            if !current.status.is_loading() {
                core.resume = (current.status, current.error.clone());
            }
        }
        core.generation += 1;
        let ticket = Ticket {
            generation: core.generation,
            kind,
            offset,
            resume: core.resume.clone(),
        };

        let data = match kind {
            RequestKind::Load => Vec::new(),
            RequestKind::LoadMore => self.tx.borrow().data.clone(),
        };
        self.publish(
            &core,
            PagingState {
                request: kind,
                offset: PageOffset::Available(offset),
                status: PagingStatus::Loading,
                data,
                error: None,
            },
        );

        let (done_tx, done_rx) = oneshot::channel();
        let inner = Arc::clone(self);
        core.in_flight = Some(self.runtime.spawn(async move {
            let result = inner.fetcher.fetch_page(&query, offset).await;
            let outcome = inner.complete(ticket, result);
            let _ = done_tx.send(outcome);
        }));

        debug!(generation = core.generation, offset, request = ?kind, "Fetch started");
        RequestHandle::pending(done_rx)
    }

    fn complete(&self, ticket: Ticket, result: Result<Page<F::Item>>) -> RequestOutcome {
        let Ticket {
            generation,
            kind,
            offset,
            resume,
        } = ticket;

        let mut core = self.core.lock();
        if core.generation != generation {
            trace!(generation, current = core.generation, "Dropping stale fetch result");
            return RequestOutcome::Superseded;
        }
        core.in_flight = None;

        match result {
            Ok(page) => {
                let next = self.pagination.advance_from(offset, page.next_offset);
                debug!(
                    generation,
                    records = page.items.len(),
                    next = %next,
                    "Fetch succeeded"
                );
                self.publish(
                    &core,
                    PagingState {
                        request: kind,
                        offset: next,
                        status: PagingStatus::Success,
                        data: page.items,
                        error: None,
                    },
                );
                RequestOutcome::Succeeded
            }
            Err(e) if e.is_cancelled() => {
                // Undo the loading transition without surfacing a failure.
                debug!(generation, "Fetch reported cancellation");
                let state = match kind {
                    RequestKind::Load => PagingState::initial(self.pagination.get()),
                    RequestKind::LoadMore => {
                        let (status, error) = resume;
                        PagingState {
                            request: kind,
                            offset: self.pagination.get(),
                            status,
                            data: self.tx.borrow().data.clone(),
                            error,
                        }
                    }
                };
                self.publish(&core, state);
                RequestOutcome::Superseded
            }
            Err(e) => {
                if kind.is_load_more()
                    && self.config.load_more_failure == LoadMoreFailurePolicy::CompletePagination
                {
                    self.pagination.complete();
                }
                warn!(generation, request = ?kind, error = %e, "Fetch failed");
                let data = self.tx.borrow().data.clone();
                self.publish(
                    &core,
                    PagingState {
                        request: kind,
                        offset: self.pagination.get(),
                        status: PagingStatus::Failure,
                        data,
                        error: Some(Arc::new(e)),
                    },
                );
                RequestOutcome::Failed
            }
        }
    }

    fn reset(&self) {
        let mut core = self.core.lock();
        core.generation += 1;
        core.abort_in_flight();
        self.pagination.reset();
        self.publish(&core, PagingState::initial(self.pagination.get()));
    }
}

/// Paginated loader over a [`PageFetcher`]
///
/// Fetches run on the tokio runtime captured at construction, so `load` and
/// friends may be called from any thread. Dropping the loader aborts the
/// in-flight fetch and stops periodic refresh.
pub struct PageLoader<F: PageFetcher> {
    inner: Arc<LoaderInner<F>>,
    refresh: Mutex<Option<PollingProcess>>,
}

impl<F: PageFetcher> PageLoader<F> {
    /// Create a loader with default config on the current runtime
    pub fn new(fetcher: F) -> Result<Self> {
        Self::with_config(fetcher, LoaderConfig::default())
    }

    /// Create a loader on the current runtime
    pub fn with_config(fetcher: F, config: LoaderConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime {
            message: e.to_string(),
        })?;
        Ok(Self::with_runtime(fetcher, config, runtime))
    }

    /// Create a loader spawning fetches onto `runtime`
    pub fn with_runtime(fetcher: F, config: LoaderConfig, runtime: Handle) -> Self {
        let pagination = Pagination::new(config.initial_offset);
        let (tx, _) = watch::channel(PagingState::initial(pagination.get()));
        Self {
            inner: Arc::new(LoaderInner {
                fetcher,
                config,
                runtime,
                pagination,
                core: Mutex::new(Core {
                    generation: 0,
                    in_flight: None,
                    resume: (PagingStatus::Initial, None),
                    observers: Vec::new(),
                    next_observer: 0,
                }),
                tx,
            }),
            refresh: Mutex::new(None),
        }
    }

    /// Load the first page, superseding anything in flight
    pub fn load(&self, query: F::Query) -> RequestHandle {
        self.inner.start(RequestKind::Load, query)
    }

    /// Load the page at the current offset, superseding anything in flight
    ///
    /// Skipped when pagination is completed.
    pub fn load_more(&self, query: F::Query) -> RequestHandle {
        self.inner.start(RequestKind::LoadMore, query)
    }

    /// Cancel in-flight work and return to the initial state
    pub fn reset(&self) {
        self.inner.reset();
    }

    /// Current state snapshot
    ///
    /// The offset reflects local adjustments made through [`Self::pagination`].
    pub fn state(&self) -> PagingState<F::Item> {
        let mut state = self.inner.tx.borrow().clone();
        state.offset = self.inner.pagination.get();
        state
    }

    /// Subscribe to snapshots; the latest one is available immediately
    ///
    /// Slow receivers only see the newest snapshot. Use [`Self::observe`] when
    /// every transition matters.
    pub fn subscribe(&self) -> watch::Receiver<PagingState<F::Item>> {
        self.inner.tx.subscribe()
    }

    /// Snapshots as a stream, starting with the current one
    pub fn stream(&self) -> impl Stream<Item = PagingState<F::Item>> + Send + 'static {
        let rx = self.subscribe();
        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first {
                rx.changed().await.ok()?;
            }
            let state = rx.borrow_and_update().clone();
            Some((state, (rx, false)))
        })
    }

    /// Register a callback invoked with the current state and then with every
    /// transition, in order
    ///
    /// Callbacks run while the loader's lock is held and must not call back
    /// into the loader.
    pub fn observe(
        &self,
        observer: impl Fn(&PagingState<F::Item>) + Send + Sync + 'static,
    ) -> ObserverId {
        let mut core = self.inner.core.lock();
        core.next_observer += 1;
        let id = ObserverId(core.next_observer);
        {
            let current = self.inner.tx.borrow();
            observer(&*current);
        }
        core.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a registered observer
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut core = self.inner.core.lock();
        let before = core.observers.len();
        core.observers.retain(|(observer_id, _)| *observer_id != id);
        core.observers.len() != before
    }

    /// Shared offset cell
    pub fn pagination(&self) -> Pagination {
        self.inner.pagination.clone()
    }

    /// Check if a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.inner.core.lock().fetch_in_flight()
    }

    /// Loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Re-run `load(query)` periodically, replacing any previous refresh
    pub fn start_refresh(&self, query: F::Query, config: &PollingConfig) {
        self.stop_refresh();

        let process = PollingProcess::new(
            RefreshOperation::new(Arc::clone(&self.inner), query, self.inner.runtime.clone()),
            TokioScheduler::with_runtime(self.inner.runtime.clone()),
            config.interval(),
        );
        process.start(config.immediately);
        info!(interval_ms = config.interval_ms, "Periodic refresh started");
        *self.refresh.lock() = Some(process);
    }

    /// Stop periodic refresh
    pub fn stop_refresh(&self) {
        let previous = self.refresh.lock().take();
        if let Some(process) = previous {
            process.stop();
        }
    }

    /// Check if periodic refresh is running
    pub fn is_refreshing(&self) -> bool {
        self.refresh
            .lock()
            .as_ref()
            .is_some_and(PollingProcess::is_running)
    }
}

impl<F: PageFetcher> Drop for PageLoader<F> {
    fn drop(&mut self) {
        self.stop_refresh();
        self.inner.core.lock().abort_in_flight();
    }
}

impl<F: PageFetcher> std::fmt::Debug for PageLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.tx.borrow();
        f.debug_struct("PageLoader")
            .field("status", &state.status)
            .field("offset", &self.inner.pagination.get())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
