//! Page list value and reducer

use crate::error::{Error, Result};
use crate::pagination::PageOffset;
use crate::paging::PagingState;
use crate::types::{PagingStatus, RequestKind};
use std::sync::Arc;

/// Accumulated list of paged records
#[derive(Debug, Clone)]
pub struct PageList<T> {
    items: Vec<T>,
    request: RequestKind,
    status: PagingStatus,
    offset: PageOffset,
    error: Option<Arc<Error>>,
}

impl<T> Default for PageList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            request: RequestKind::Load,
            status: PagingStatus::Initial,
            offset: PageOffset::default(),
            error: None,
        }
    }
}

impl<T: Clone> PageList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of paging states into a list
    pub fn fold<'a, I>(states: I) -> Self
    where
        I: IntoIterator<Item = &'a PagingState<T>>,
        T: 'a,
    {
        states.into_iter().fold(Self::new(), |mut list, state| {
            list.reduce(state);
            list
        })
    }

    /// Apply one paging state
    ///
    /// A `Load` success replaces the items, a `LoadMore` success appends, and
    /// the `Initial` state (a reset) clears them. Every state updates the
    /// status, error, offset and request bookkeeping.
    pub fn reduce(&mut self, state: &PagingState<T>) {
        match (state.status, state.request) {
            (PagingStatus::Success, RequestKind::Load) => {
                self.items.clone_from(&state.data);
            }
            (PagingStatus::Success, RequestKind::LoadMore) => {
                self.items.extend(state.data.iter().cloned());
            }
            (PagingStatus::Initial, _) => self.items.clear(),
            (PagingStatus::Loading | PagingStatus::Failure, _) => {}
        }
        self.request = state.request;
        self.status = state.status;
        self.offset = state.offset;
        self.error.clone_from(&state.error);
    }
}

impl<T> PageList<T> {
    /// Records in order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Record at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Status of the last applied state
    pub fn status(&self) -> PagingStatus {
        self.status
    }

    /// Request of the last applied state
    pub fn request(&self) -> RequestKind {
        self.request
    }

    /// Offset carried by the last applied state
    pub fn offset(&self) -> PageOffset {
        self.offset
    }

    /// Error of the last applied state
    pub fn error(&self) -> Option<&Arc<Error>> {
        self.error.as_ref()
    }

    /// Consume the list, returning its records
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub(super) fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::out_of_bounds(index, self.items.len()));
        }
        self.items.insert(index, item);
        Ok(())
    }

    pub(super) fn replace(&mut self, index: usize, item: T) -> Result<T> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or_else(|| Error::out_of_bounds(index, len))?;
        Ok(std::mem::replace(slot, item))
    }

    pub(super) fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::out_of_bounds(index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }

    pub(super) fn set_offset(&mut self, offset: PageOffset) {
        self.offset = offset;
    }
}
