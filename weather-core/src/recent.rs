//! Bounded, case-insensitively deduplicated, most-recent-first list of
//! place names that survives restarts.

use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Upper bound on remembered places.
pub const MAX_RECENT: usize = 5;

/// Storage key the list is persisted under, JSON-encoded.
pub const STORAGE_KEY: &str = "recentSearches";

#[derive(Debug)]
pub struct RecentSearchesStore<S> {
    storage: S,
}

impl<S: KeyValueStore> RecentSearchesStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Persisted list, or empty when absent, unreadable or not a list of strings.
    pub fn load(&self) -> Vec<String> {
        let raw = match self.storage.get_string(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "could not read recent searches; starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, "stored recent searches are corrupt; ignoring");
                Vec::new()
            }
        }
    }

    /// Move `place` to the front, drop case-insensitive duplicates, cap the
    /// length and persist. Blank names leave the list untouched.
    ///
    /// Persistence failures are logged and swallowed; the new list is still
    /// returned.
    pub fn record(&self, place: &str) -> Vec<String> {
        let place = place.trim();
        let current = self.load();
        if place.is_empty() {
            return current;
        }

        let updated = push_front_dedup(current, place);

        match serde_json::to_string(&updated) {
            Ok(encoded) => {
                if let Err(err) = self.storage.set_string(STORAGE_KEY, &encoded) {
                    warn!(error = %err, place, "failed to persist recent searches");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode recent searches"),
        }

        debug!(place, len = updated.len(), "recorded recent search");
        updated
    }
}

fn push_front_dedup(list: Vec<String>, place: &str) -> Vec<String> {
    let needle = place.to_lowercase();
    let mut updated = Vec::with_capacity(MAX_RECENT);
    updated.push(place.to_string());
    updated.extend(list.into_iter().filter(|item| item.to_lowercase() != needle));
    updated.truncate(MAX_RECENT);
    updated
}
