//! Page fetch types and traits

use crate::error::Result;
use crate::pagination::PageOffset;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// One page returned by a fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records of this page, in server order
    pub items: Vec<T>,
    /// Offset of the page after this one
    pub next_offset: PageOffset,
}

impl<T> Page<T> {
    /// Create a page with an explicit next offset
    pub fn new(items: Vec<T>, next_offset: PageOffset) -> Self {
        Self { items, next_offset }
    }

    /// Create a page followed by more pages at `next`
    pub fn more(items: Vec<T>, next: u64) -> Self {
        Self::new(items, PageOffset::Available(next))
    }

    /// Create the final page
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, PageOffset::Completed)
    }

    /// Number of records in this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Data source consumed by the page loader
///
/// Implementations may run for as long as they need; the loader cancels a
/// superseded fetch by aborting the task it runs on. Returning
/// [`Error::Cancelled`](crate::Error::Cancelled) is treated as supersession,
/// not failure.
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    /// Query identifying the list being paged
    type Query: Clone + Send + Sync + 'static;
    /// Record type
    type Item: Clone + Send + Sync + 'static;

    /// Fetch the page starting at `offset`
    async fn fetch_page(&self, query: &Self::Query, offset: u64) -> Result<Page<Self::Item>>;
}

/// `PageFetcher` backed by an async closure
pub struct FnFetcher<F, Q, T> {
    f: F,
    _marker: PhantomData<fn(Q) -> T>,
}

impl<F, Q, T> FnFetcher<F, Q, T> {
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

/// Shorthand for [`FnFetcher::new`]
pub fn fetcher_fn<F, Fut, Q, T>(f: F) -> FnFetcher<F, Q, T>
where
    F: Fn(Q, u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
    Q: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    FnFetcher::new(f)
}

#[async_trait]
impl<F, Fut, Q, T> PageFetcher for FnFetcher<F, Q, T>
where
    F: Fn(Q, u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
    Q: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    type Query = Q;
    type Item = T;

    async fn fetch_page(&self, query: &Q, offset: u64) -> Result<Page<T>> {
        (self.f)(query.clone(), offset).await
    }
}

impl<F, Q, T> std::fmt::Debug for FnFetcher<F, Q, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}
