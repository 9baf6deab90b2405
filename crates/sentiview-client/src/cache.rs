//! In-memory TTL cache for API responses.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// Key → (value, stored-at) map with a fixed expiry checked on read.
///
/// There is no eviction beyond expiry: an entry lives until a read finds it
/// stale or [`TtlCache::clear`] is called. The mutex only guards the map so
/// the cache can sit behind `&self` on the client; lookups never hold it
/// across an await point.
pub struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the stored value if it is still within the expiry window.
    ///
    /// Expired entries are removed on the way out.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: T) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.into(),
                CacheEntry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |e| e.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_value_within_expiry_window() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        cache.insert("k", 7);
        assert_eq!(cache.get("k"), Some(7));
    }

    #[test]
    fn returns_none_after_expiry() {
        // Zero TTL expires everything instantly.
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 7);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn expired_entries_are_removed_on_read() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 7);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn missing_key_returns_none() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("absent"), None);
    }

    #[test]
    fn insert_overwrites_previous_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 1);
        cache.insert("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }
}
