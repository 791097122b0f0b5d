//! Cache Statistics Module
//!
//! Per-tier counters reported by `GET /stats`.

use serde::Serialize;

// == Cache Stats ==
/// Lookup outcomes and size of one store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups that found nothing live, expired entries included
    pub misses: u64,
    /// Entries dropped after their TTL, on read or by the sweep
    pub expired: u64,
    /// Entries currently held
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Lookups ==
    /// Total lookups seen by the store.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    // == Hit Rate ==
    /// Share of lookups that hit; 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Expired ==
    /// Adds `count` dropped entries.
    pub fn record_expired(&mut self, count: u64) {
        self.expired += count;
    }

    // == Entry Count ==
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
