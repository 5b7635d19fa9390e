//! Incremental pagination state
//!
//! Pure state machine for loading a paginated collection one page at a time.
//! The shell owns the actual request; this module decides whether a request
//! may start, which URL it targets, and what a finished request does to the
//! accumulated items.
//!
//! ```text
//! Idle --begin--> Fetching --complete(non-empty)--> Idle
//!                          --complete(empty)------> Exhausted
//!                          --fail-----------------> Failed
//! ```
//!
//! `Exhausted` and `Failed` are terminal: once reached, no further page is
//! ever requested by the same cursor.

use serde::Serialize;

/// First page number of every paginated admin collection.
pub const FIRST_PAGE: u64 = 1;

/// Lifecycle of a page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderState {
    /// Ready to request the next page.
    Idle,
    /// A request is in flight.
    Fetching,
    /// The server returned an empty page. No more data.
    Exhausted,
    /// A request failed. Pagination stops.
    Failed,
}

impl LoaderState {
    /// True for `Exhausted` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoaderState::Exhausted | LoaderState::Failed)
    }

    /// True in every state but `Idle`; this is the old "busy" flag.
    pub fn is_busy(self) -> bool {
        self != LoaderState::Idle
    }
}

impl std::fmt::Display for LoaderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoaderState::Idle => "idle",
            LoaderState::Fetching => "fetching",
            LoaderState::Exhausted => "exhausted",
            LoaderState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a single "load next page" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A non-empty page was appended; carries the number of new items.
    Appended(usize),
    /// The page was empty. The cursor is now exhausted.
    Exhausted,
    /// No request was made because the cursor was not idle.
    Skipped(LoaderState),
}

/// Build the URL of a page: the resource base followed by the page number.
///
/// The base is used verbatim, so `"/admin/api/posts/"` yields
/// `"/admin/api/posts/3"` for page 3.
pub fn page_url(base_url: &str, page: u64) -> String {
    format!("{base_url}{page}")
}

/// Accumulated state of an incrementally loaded collection.
#[derive(Debug, Clone)]
pub struct PageCursor<T> {
    base_url: String,
    page: u64,
    items: Vec<T>,
    state: LoaderState,
}

impl<T> PageCursor<T> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page: FIRST_PAGE,
            items: Vec::new(),
            state: LoaderState::Idle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Page number the next request will ask for.
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn is_fetching(&self) -> bool {
        self.state.is_busy()
    }

    /// Try to start a request.
    ///
    /// Returns the URL to fetch and moves to `Fetching` when idle. In any
    /// other state nothing changes and the current state is returned as the
    /// error.
    pub fn begin(&mut self) -> Result<String, LoaderState> {
        if self.state != LoaderState::Idle {
            return Err(self.state);
        }
        self.state = LoaderState::Fetching;
        Ok(page_url(&self.base_url, self.page))
    }

    /// Finish the in-flight request with the page the server returned.
    ///
    /// Only a request started with [`PageCursor::begin`] can complete; a
    /// stray completion is reported as `Skipped` and ignored.
    pub fn complete(&mut self, page: Vec<T>) -> LoadOutcome {
        if self.state != LoaderState::Fetching {
            return LoadOutcome::Skipped(self.state);
        }

        if page.is_empty() {
            self.state = LoaderState::Exhausted;
            return LoadOutcome::Exhausted;
        }

        let count = page.len();
        self.items.extend(page);
        self.page += 1;
        self.state = LoaderState::Idle;
        LoadOutcome::Appended(count)
    }

    /// Finish the in-flight request as failed.
    pub fn fail(&mut self) {
        if self.state == LoaderState::Fetching {
            self.state = LoaderState::Failed;
        }
    }
}
