//! Cache Tiers Module
//!
//! Three process-wide stores distinguished by default TTL. Tiers are a
//! capacity hint, not an access boundary: any caller may use any tier.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore, LONG_TTL, MEDIUM_TTL, SHORT_TTL};
use crate::config::Config;

/// Store shared between the features, the call wrapper and the cleanup job.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Selects one of the three stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Short,
    Medium,
    Long,
}

/// Per-tier statistics snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    pub short: CacheStats,
    pub medium: CacheStats,
    pub long: CacheStats,
}

// == Cache Tiers ==
/// Short, medium and long TTL stores, cloned cheaply into every collaborator.
#[derive(Debug, Clone)]
pub struct CacheTiers {
    short: SharedCache,
    medium: SharedCache,
    long: SharedCache,
}

impl CacheTiers {
    /// Creates three empty stores with the given default TTLs.
    pub fn new(short: Duration, medium: Duration, long: Duration) -> Self {
        Self {
            short: Arc::new(RwLock::new(CacheStore::new(short))),
            medium: Arc::new(RwLock::new(CacheStore::new(medium))),
            long: Arc::new(RwLock::new(CacheStore::new(long))),
        }
    }

    /// Creates the tiers with TTLs taken from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_secs(config.short_ttl),
            Duration::from_secs(config.medium_ttl),
            Duration::from_secs(config.long_ttl),
        )
    }

    /// Returns the store backing `tier`.
    pub fn tier(&self, tier: Tier) -> &SharedCache {
        match tier {
            Tier::Short => &self.short,
            Tier::Medium => &self.medium,
            Tier::Long => &self.long,
        }
    }

    pub fn medium(&self) -> &SharedCache {
        &self.medium
    }

    // == Cleanup ==
    /// Sweeps expired entries from every tier, returning the total removed.
    pub async fn cleanup_all(&self) -> usize {
        let mut removed = 0;
        for tier in [Tier::Short, Tier::Medium, Tier::Long] {
            removed += self.tier(tier).write().await.cleanup();
        }
        removed
    }

    /// Empties every tier.
    pub async fn clear_all(&self) {
        for tier in [Tier::Short, Tier::Medium, Tier::Long] {
            self.tier(tier).write().await.clear();
        }
    }

    // == Stats ==
    pub async fn stats(&self) -> TierStats {
        TierStats {
            short: self.short.read().await.stats(),
            medium: self.medium.read().await.stats(),
            long: self.long.read().await.stats(),
        }
    }
}

impl Default for CacheTiers {
    fn default() -> Self {
        Self::new(SHORT_TTL, MEDIUM_TTL, LONG_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_tier_ttls() {
        let tiers = CacheTiers::default();

        assert_eq!(tiers.tier(Tier::Short).read().await.default_ttl(), SHORT_TTL);
        assert_eq!(tiers.tier(Tier::Medium).read().await.default_ttl(), MEDIUM_TTL);
        assert_eq!(tiers.tier(Tier::Long).read().await.default_ttl(), LONG_TTL);
    }

    #[tokio::test]
    async fn test_tiers_are_independent() {
        let tiers = CacheTiers::default();

        tiers.tier(Tier::Short).write().await.set("k", json!("short"), None);
        tiers.tier(Tier::Long).write().await.set("k", json!("long"), None);

        assert_eq!(tiers.tier(Tier::Short).write().await.get("k"), Some(json!("short")));
        assert_eq!(tiers.tier(Tier::Long).write().await.get("k"), Some(json!("long")));
        assert!(tiers.tier(Tier::Medium).write().await.get("k").is_none());
    }

    #[tokio::test]
    async fn test_clones_share_stores() {
        let tiers = CacheTiers::default();
        let clone = tiers.clone();

        clone.medium().write().await.set("shared", json!(true), None);

        assert_eq!(tiers.medium().write().await.get("shared"), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_cleanup_all_sweeps_every_tier() {
        let tiers = CacheTiers::default();
        let ttl = Some(Duration::from_millis(20));

        tiers.tier(Tier::Short).write().await.set("a", json!(1), ttl);
        tiers.tier(Tier::Medium).write().await.set("b", json!(2), ttl);
        tiers.tier(Tier::Long).write().await.set("c", json!(3), None);

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(tiers.cleanup_all().await, 2);
        let stats = tiers.stats().await;
        assert_eq!(stats.short.total_entries, 0);
        assert_eq!(stats.medium.total_entries, 0);
        assert_eq!(stats.long.total_entries, 1);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let tiers = CacheTiers::default();
        tiers.tier(Tier::Long).write().await.set("c", json!(3), None);

        tiers.clear_all().await;

        assert!(tiers.tier(Tier::Long).read().await.is_empty());
    }
}
