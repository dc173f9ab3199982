//! Title case memoization
//!
//! Casing is called for every table, column and relationship name on every
//! template invocation, so results are kept for the life of the process.
//! The cache is bounded by the number of distinct schema identifiers.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::trace;

/// Shared cache of title-cased identifiers keyed by the exact raw input
///
/// Construct one per process and hand it (usually inside an `Arc`) to every
/// worker that calls into [`crate::naming`].
#[derive(Debug, Default)]
pub struct NameCache {
    titles: RwLock<HashMap<String, String>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously computed title case
    pub fn get(&self, raw: &str) -> Option<String> {
        self.titles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(raw)
            .cloned()
    }

    /// Return the cached value for `raw`, computing and storing it on a miss
    pub fn get_or_insert_with(&self, raw: &str, compute: impl FnOnce(&str) -> String) -> String {
        if let Some(hit) = self.get(raw) {
            return hit;
        }

        let value = compute(raw);

        let mut titles = self.titles.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have raced us here; both computed the same value.
        let stored = titles
            .entry(raw.to_string())
            .or_insert_with(|| value.clone());
        trace!(raw = ?raw, cased = ?stored, "Cached title case");

        stored.clone()
    }

    pub fn len(&self) -> usize {
        self.titles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
