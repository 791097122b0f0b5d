//! Cache Module
//!
//! Provides in-memory TTL caching in three tiers plus content-addressed keys.

mod entry;
mod key;
mod stats;
mod store;
mod tiers;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::{cache_key, hash_prompt};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use tiers::{CacheTiers, SharedCache, Tier, TierStats};

use std::time::Duration;

// == Public Constants ==
/// Default TTL of the short tier (5 minutes)
pub const SHORT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default TTL of the medium tier (1 hour)
pub const MEDIUM_TTL: Duration = Duration::from_secs(60 * 60);

/// Default TTL of the long tier (24 hours)
pub const LONG_TTL: Duration = Duration::from_secs(24 * 60 * 60);
