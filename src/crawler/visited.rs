//! Visited-URL ledger used when the crawl fetches unique URLs only

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of URLs already scheduled for fetching
///
/// A URL enters the set at most once and is never removed. Checking and
/// inserting happen under one lock, so concurrent callers presenting the same
/// URL cannot both see it as new.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not yet present and has now been recorded
    /// * `false` - Some earlier caller already recorded this URL
    pub fn mark_if_new(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
