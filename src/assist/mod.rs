//! Assist Module
//!
//! The five AI-assisted features. Each one builds a feature-level cache key,
//! consults its tier, renders a prompt, calls the [`CachedGenerator`] with a
//! local fallback, and parses the text into its result type.
//!
//! Public feature functions never return errors: failures are logged and
//! turned into the feature's "no result" value.

mod category;
mod description;
pub mod parse;
mod prioritize;
mod report;
mod titles;

pub use prioritize::{AtRiskTask, PrioritizedTask, Prioritization};

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::ai::{CachedGenerator, TextGenerator};
use crate::cache::{CacheTiers, Tier};
use crate::models::Task;
use crate::source::TaskSource;

/// Message returned in place of a result when an operation fails unexpectedly.
pub const AI_FAILURE_MESSAGE: &str = "Could not complete AI operation";

// == Assist Service ==
/// Entry point for the AI-assisted features.
#[derive(Clone)]
pub struct AssistService {
    generator: CachedGenerator,
    tiers: CacheTiers,
    tasks: Arc<dyn TaskSource>,
}

impl AssistService {
    /// Wires the service to its collaborators. The prompt cache of the
    /// generator lives in the medium tier.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        tiers: CacheTiers,
        tasks: Arc<dyn TaskSource>,
    ) -> Self {
        Self {
            generator: CachedGenerator::new(generator, tiers.medium().clone()),
            tiers,
            tasks,
        }
    }

    pub fn tiers(&self) -> &CacheTiers {
        &self.tiers
    }

    /// Whether remote generation is possible at all.
    pub fn is_ai_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// User history for prompt context; a failing source yields no context.
    async fn context_tasks(&self, user_id: &str, limit: usize) -> Vec<Task> {
        match self.tasks.recent_tasks(user_id, Some(limit)).await {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(error = %err, user_id, "Could not load task history for context");
                Vec::new()
            }
        }
    }

    // == Feature Cache ==
    async fn cached<T: DeserializeOwned>(&self, tier: Tier, key: &str) -> Option<T> {
        let value = self.tiers.tier(tier).write().await.get(key)?;
        match serde_json::from_value(value) {
            Ok(result) => {
                debug!(key, ?tier, "Feature cache hit");
                Some(result)
            }
            Err(err) => {
                warn!(error = %err, key, "Discarding malformed cache entry");
                self.tiers.tier(tier).write().await.delete(key);
                None
            }
        }
    }

    async fn remember<T: Serialize>(&self, tier: Tier, key: String, result: &T, ttl: Option<Duration>) {
        match serde_json::to_value(result) {
            Ok(value) => self.tiers.tier(tier).write().await.set(key, value, ttl),
            Err(err) => warn!(error = %err, "Could not cache feature result"),
        }
    }
}

/// Newest first, at most `limit`.
fn newest_first(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut tasks = tasks.to_vec();
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tasks.truncate(limit);
    tasks
}
