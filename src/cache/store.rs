//! Cache Store Module
//!
//! Time-expiring key/value store. Expired entries are removed lazily on read
//! and eagerly by [`CacheStore::cleanup`].

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// TTL cache holding JSON values.
///
/// Writes are last-write-wins: at most one live entry exists per key.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<Value>>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL used when `set` is called without an override
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new, empty CacheStore.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for entries stored without an explicit override
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    /// Returns the TTL applied when no override is given.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, unconditionally replacing any existing entry for `key`.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL override (uses the store default if None)
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.into(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns None if the key is absent or its entry has expired; an expired
    /// entry is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            debug!(key, "Dropped expired cache entry on read");
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Cleanup ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());

        let removed = before - self.entries.len();
        self.stats.record_expired(removed as u64);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes every entry, expired or not.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    fn store() -> CacheStore {
        CacheStore::new(Duration::from_secs(300))
    }

    #[test]
    fn test_store_new() {
        let store = store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store();

        store.set("key1", json!("value1"), None);

        assert_eq!(store.get("key1"), Some(json!("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_delete() {
        let mut store = store();

        store.set("key1", json!("value1"), None);
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let mut store = store();
        store.set("key1", json!(1), None);

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store();

        store.set("key1", json!("value1"), None);
        store.set("key1", json!(["value", 2]), None);

        assert_eq!(store.get("key1"), Some(json!(["value", 2])));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration_removes_entry() {
        let mut store = store();

        store.set("key1", json!("value1"), Some(Duration::from_millis(40)));
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        assert!(store.get("key1").is_none());
        // The expired read removed the entry, so a sweep finds nothing
        assert_eq!(store.len(), 0);
        assert_eq!(store.cleanup(), 0);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = store();

        store.set("key1", json!("short"), Some(Duration::from_millis(40)));
        store.set("key1", json!("long"), Some(Duration::from_secs(60)));

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("key1"), Some(json!("long")));
    }

    #[test]
    fn test_store_stats() {
        let mut store = store();

        store.set("key1", json!("value1"), None);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_cleanup() {
        let mut store = store();

        store.set("key1", json!("value1"), Some(Duration::from_millis(30)));
        store.set("key2", json!("value2"), Some(Duration::from_secs(10)));

        sleep(Duration::from_millis(70));

        assert_eq!(store.cleanup(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
        assert_eq!(store.stats().expired, 1);
    }

    #[test]
    fn test_store_clear() {
        let mut store = store();

        store.set("a", json!(1), None);
        store.set("b", json!(2), None);
        store.clear();

        assert!(store.is_empty());
        assert!(store.get("a").is_none());
    }
}
