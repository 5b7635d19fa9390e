//! Incremental page loader
//!
//! Drives a [`PageCursor`] against a real fetch. One loader exists per view
//! (post list, image gallery); loaders never share state.
//!
//! `load_next` takes `&self` so that several callers (a burst of scroll
//! events, a `join!` of requests) can hit the same loader at once. The cursor
//! state decides who gets to fetch: only a call that finds the loader `Idle`
//! issues a request, every other call returns `Skipped` straight away. The
//! mutex around the cursor is only held to switch state, never across the
//! request itself.

use crate::error::Error;
use blogadmin_core::pagination::{LoadOutcome, LoaderState, PageCursor};
use futures::future::BoxFuture;
use log::{debug, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Capability to fetch one page of a collection as a JSON array.
pub trait PageFetcher<T>: Send + Sync {
    fn fetch_page<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<T>, Error>>;
}

pub struct PageLoader<T, F> {
    fetcher: F,
    cursor: Mutex<PageCursor<T>>,
}

impl<T, F> PageLoader<T, F>
where
    F: PageFetcher<T>,
{
    /// New loader over `resource_url`; the first request targets page 1.
    pub fn new(resource_url: impl Into<String>, fetcher: F) -> Self {
        Self {
            fetcher,
            cursor: Mutex::new(PageCursor::new(resource_url)),
        }
    }

    fn cursor(&self) -> MutexGuard<'_, PageCursor<T>> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the next page and append it.
    ///
    /// A failed request is reported once through the error; the loader then
    /// stays `Failed` and later calls are skipped.
    pub async fn load_next(&self) -> Result<LoadOutcome, Error> {
        let begun = self.cursor().begin();
        let url = match begun {
            Ok(url) => url,
            Err(state) => {
                debug!("Skipping page load, loader is {state}");
                return Ok(LoadOutcome::Skipped(state));
            }
        };

        debug!("Loading {url}");
        match self.fetcher.fetch_page(&url).await {
            Ok(page) => {
                let outcome = self.cursor().complete(page);
                debug!("{url}: {outcome:?}");
                Ok(outcome)
            }
            Err(err) => {
                self.cursor().fail();
                warn!("Loading {url} failed, pagination stopped: {err}");
                Err(err)
            }
        }
    }

    /// Load pages until the collection is exhausted, or until `limit` pages
    /// were appended. Returns the number of pages appended by this call.
    pub async fn load_pages(&self, limit: Option<usize>) -> Result<usize, Error> {
        let mut loaded = 0;
        while limit.map_or(true, |max| loaded < max) {
            match self.load_next().await? {
                LoadOutcome::Appended(_) => loaded += 1,
                LoadOutcome::Exhausted | LoadOutcome::Skipped(_) => break,
            }
        }
        debug!(
            "{}: {loaded} new page(s), {} items, {}",
            self.base_url(),
            self.item_count(),
            self.state()
        );
        Ok(loaded)
    }

    pub fn state(&self) -> LoaderState {
        self.cursor().state()
    }

    #[cfg(test)]
    pub fn is_fetching(&self) -> bool {
        self.cursor().is_fetching()
    }

    /// Page number the next request will ask for.
    pub fn page(&self) -> u64 {
        self.cursor().page()
    }

    pub fn item_count(&self) -> usize {
        self.cursor().items().len()
    }

    pub fn base_url(&self) -> String {
        self.cursor().base_url().to_string()
    }

    /// Run `f` over the items loaded so far.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(self.cursor().items())
    }
}

#[cfg(test)]
impl<T: Clone, F: PageFetcher<T>> PageLoader<T, F> {
    /// Snapshot of the items loaded so far.
    pub fn items(&self) -> Vec<T> {
        self.with_items(<[T]>::to_vec)
    }
}
