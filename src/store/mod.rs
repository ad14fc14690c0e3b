//! Cache/status store
//!
//! Process-wide state tracking, per category, the last completed scrape
//! result and the current population status. All access goes through the
//! atomic operations on [`MovieStore`]; the map itself is never exposed.
//!
//! Per-category state machine:
//!
//! ```text
//! NotStarted -> InProgress -> Completed
//!                          -> Failed
//! ```
//!
//! A new attempt may only start from `NotStarted` or a terminal state, so at
//! most one attempt per category is in flight at any time.

use crate::catalog::Category;
use crate::record::MovieRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Population status of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapeStatus {
    /// No scrape has ever been started for this category
    #[default]
    NotStarted,

    /// A scrape task is currently running
    InProgress,

    /// The last scrape finished and its result is cached
    Completed,

    /// The last scrape failed; no cache entry was written
    Failed,
}

impl ScrapeStatus {
    /// Returns true if a new scrape attempt may be started from this state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// The cached result of one successful scrape
///
/// Overwritten whole on a subsequent successful scrape, never merged.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub category: Category,
    pub movies: Vec<MovieRecord>,
    pub retrieved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CategoryState {
    status: ScrapeStatus,
    cache: Option<CacheEntry>,
}

/// Shared store of per-category cache entries and scrape statuses
///
/// A single mutex guards the whole map; it is only ever held for map
/// operations (never across an await), and gives readers a consistent
/// (status, cache) snapshot. The check-and-set in [`MovieStore::try_start`]
/// is the admission-control gate preventing duplicate concurrent scrapes.
#[derive(Debug, Default)]
pub struct MovieStore {
    entries: Mutex<HashMap<Category, CategoryState>>,
}

impl MovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status for a category, `NotStarted` if never touched
    pub fn get_status(&self, category: Category) -> ScrapeStatus {
        let entries = self.entries.lock().unwrap();
        entries.get(&category).map(|s| s.status).unwrap_or_default()
    }

    /// The cached entry for a category, if a scrape ever completed
    pub fn get_cache(&self, category: Category) -> Option<CacheEntry> {
        let entries = self.entries.lock().unwrap();
        entries.get(&category).and_then(|s| s.cache.clone())
    }

    /// Atomically admits a new scrape attempt
    ///
    /// Transitions `NotStarted` or a terminal state to `InProgress` and
    /// returns true. Returns false without mutating if an attempt is already
    /// in flight. Under concurrent invocation exactly one caller wins.
    pub fn try_start(&self, category: Category) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let state = entries.entry(category).or_default();

        if !state.status.is_terminal() {
            return false;
        }

        state.status = ScrapeStatus::InProgress;
        true
    }

    /// Records a successful scrape: writes the cache entry, status Completed
    ///
    /// Only valid from `InProgress`; anything else is logged and ignored.
    pub fn complete(&self, category: Category, movies: Vec<MovieRecord>) {
        let mut entries = self.entries.lock().unwrap();
        let state = entries.entry(category).or_default();

        if state.status != ScrapeStatus::InProgress {
            tracing::warn!(
                category = %category,
                status = %state.status,
                "Ignoring complete() outside InProgress"
            );
            return;
        }

        state.cache = Some(CacheEntry {
            category,
            movies,
            retrieved_at: Utc::now(),
        });
        state.status = ScrapeStatus::Completed;
    }

    /// Records a failed scrape: status Failed, cache left untouched
    ///
    /// Only valid from `InProgress`; anything else is logged and ignored.
    pub fn fail(&self, category: Category) {
        let mut entries = self.entries.lock().unwrap();
        let state = entries.entry(category).or_default();

        if state.status != ScrapeStatus::InProgress {
            tracing::warn!(
                category = %category,
                status = %state.status,
                "Ignoring fail() outside InProgress"
            );
            return;
        }

        state.status = ScrapeStatus::Failed;
    }
}
