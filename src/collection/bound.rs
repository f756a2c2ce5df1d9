//! Collections bound to a page loader
//!
//! The loader pushes every transition into the collection through an
//! observer, so folds happen in production order and none are skipped.
//! Local mutations take the same lock, which serializes them against folds.

use super::types::PageList;
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::pagination::Pagination;
use crate::paging::{ObserverId, PageLoader};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

struct Shared<T> {
    list: Mutex<PageList<T>>,
    tx: watch::Sender<PageList<T>>,
}

impl<T: Clone> Shared<T> {
    fn publish(&self, list: &PageList<T>) {
        self.tx.send_replace(list.clone());
    }
}

/// Read-only list following a loader
pub struct PageListCollection<T> {
    shared: Arc<Shared<T>>,
    observer: ObserverId,
}

impl<T> PageListCollection<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Bind a new collection to `loader`, starting from its current state
    ///
    /// The loader only keeps its latest page, so binding after one or more
    /// `load_more` calls starts the list from that page alone. Bind before the
    /// first `load` to hold every page.
    pub fn bind<F>(loader: &PageLoader<F>) -> Self
    where
        F: PageFetcher<Item = T>,
    {
        let (tx, _) = watch::channel(PageList::new());
        let shared = Arc::new(Shared {
            list: Mutex::new(PageList::new()),
            tx,
        });

        let sink = Arc::clone(&shared);
        let observer = loader.observe(move |state| {
            let mut list = sink.list.lock();
            list.reduce(state);
            sink.publish(&list);
        });

        Self { shared, observer }
    }

    /// Stop following the loader; the list keeps its last contents
    pub fn unbind<F>(&self, loader: &PageLoader<F>) -> bool
    where
        F: PageFetcher<Item = T>,
    {
        loader.remove_observer(self.observer)
    }

    /// Snapshot of the list
    pub fn snapshot(&self) -> PageList<T> {
        self.shared.list.lock().clone()
    }

    /// Snapshot of the records
    pub fn items(&self) -> Vec<T> {
        self.shared.list.lock().items().to_vec()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.shared.list.lock().len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.shared.list.lock().is_empty()
    }

    /// Subscribe to list snapshots
    pub fn subscribe(&self) -> watch::Receiver<PageList<T>> {
        self.shared.tx.subscribe()
    }
}

impl<T> std::fmt::Debug for PageListCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let list = self.shared.list.lock();
        f.debug_struct("PageListCollection")
            .field("len", &list.len())
            .field("status", &list.status())
            .field("offset", &list.offset())
            .finish()
    }
}

/// List following a loader that also accepts local edits
///
/// Inserting advances the loader's offset by one and removing moves it back
/// by one, so the next server page starts right after what the client holds.
/// No edit triggers a fetch.
pub struct MutablePageListCollection<T> {
    collection: PageListCollection<T>,
    pagination: Pagination,
}

impl<T> MutablePageListCollection<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Bind a new collection to `loader`; see [`PageListCollection::bind`]
    pub fn bind<F>(loader: &PageLoader<F>) -> Self
    where
        F: PageFetcher<Item = T>,
    {
        Self {
            collection: PageListCollection::bind(loader),
            pagination: loader.pagination(),
        }
    }

    /// Insert `item` at `index` (`index == len` appends)
    pub fn insert(&self, index: usize, item: T) -> Result<()> {
        let mut list = self.collection.shared.list.lock();
        list.insert(index, item)?;
        self.pagination.increment(1);
        list.set_offset(self.pagination.get());
        debug!(index, offset = %list.offset(), "Inserted local record");
        self.collection.shared.publish(&list);
        Ok(())
    }

    /// Replace the record at `index`, returning the previous one
    pub fn update(&self, index: usize, item: T) -> Result<T> {
        let mut list = self.collection.shared.list.lock();
        let previous = list.replace(index, item)?;
        self.collection.shared.publish(&list);
        Ok(previous)
    }

    /// Remove the record at `index`
    pub fn remove(&self, index: usize) -> Result<T> {
        let mut list = self.collection.shared.list.lock();
        let removed = list.remove(index)?;
        self.pagination.decrement(1);
        list.set_offset(self.pagination.get());
        debug!(index, offset = %list.offset(), "Removed local record");
        self.collection.shared.publish(&list);
        Ok(removed)
    }

    /// See [`PageListCollection::unbind`]
    pub fn unbind<F>(&self, loader: &PageLoader<F>) -> bool
    where
        F: PageFetcher<Item = T>,
    {
        self.collection.unbind(loader)
    }

    /// Snapshot of the list
    pub fn snapshot(&self) -> PageList<T> {
        self.collection.snapshot()
    }

    /// Snapshot of the records
    pub fn items(&self) -> Vec<T> {
        self.collection.items()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Subscribe to list snapshots
    pub fn subscribe(&self) -> watch::Receiver<PageList<T>> {
        self.collection.subscribe()
    }

    /// Offset cell shared with the loader
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }
}

impl<T> std::fmt::Debug for MutablePageListCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutablePageListCollection")
            .field("collection", &self.collection)
            .field("offset", &self.pagination.get())
            .finish()
    }
}
