//! Cached Generation Module
//!
//! Wraps a [`TextGenerator`] with a prompt-hash cache and a caller-supplied
//! fallback that answers when the remote call fails.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::ai::TextGenerator;
use crate::cache::{hash_prompt, SharedCache};
use crate::error::Result;

/// Local, network-free answer derived from the prompt text alone.
pub type Fallback<'a> = &'a (dyn Fn(&str) -> String + Send + Sync);

// == Call Options ==
/// Per-call settings for [`CachedGenerator::call`].
#[derive(Clone, Copy)]
pub struct CallOptions<'a> {
    /// Consult and populate the prompt cache
    pub use_cache: bool,
    /// TTL for a cached completion (store default if None)
    pub ttl: Option<Duration>,
    /// Invoked with the prompt text when the remote call fails
    pub fallback: Option<Fallback<'a>>,
}

impl<'a> CallOptions<'a> {
    pub fn with_fallback(mut self, fallback: Fallback<'a>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }
}

impl Default for CallOptions<'_> {
    fn default() -> Self {
        Self {
            use_cache: true,
            ttl: None,
            fallback: None,
        }
    }
}

// == Cached Generator ==
#[derive(Clone)]
pub struct CachedGenerator {
    generator: Arc<dyn TextGenerator>,
    /// Prompt cache, keyed by hash of the prompt text
    cache: SharedCache,
}

impl CachedGenerator {
    /// Creates a wrapper around `generator` caching into `cache`.
    pub fn new(generator: Arc<dyn TextGenerator>, cache: SharedCache) -> Self {
        Self { generator, cache }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    // == Call ==
    /// Returns a completion for `prompt`.
    ///
    /// Cache hits never reach the network. Only remote successes are cached;
    /// a fallback answer is returned as-is. Without a fallback, the remote
    /// error propagates.
    pub async fn call(&self, prompt: &str, options: CallOptions<'_>) -> Result<String> {
        let key = hash_prompt(prompt);

        if options.use_cache {
            let cached = self.cache.write().await.get(&key);
            if let Some(Value::String(text)) = cached {
                debug!(key = %key, "Prompt cache hit");
                return Ok(text);
            }
        }

        match self.generator.generate(prompt).await {
            Ok(text) => {
                if options.use_cache {
                    self.cache
                        .write()
                        .await
                        .set(key, Value::String(text.clone()), options.ttl);
                }
                Ok(text)
            }
            Err(err) => match options.fallback {
                Some(fallback) => {
                    warn!(error = %err, "Remote generation failed, using fallback");
                    Ok(fallback(prompt))
                }
                None => Err(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::cache::CacheTiers;
    use crate::error::AssistError;

    fn wrapper(generator: &Arc<ScriptedGenerator>) -> (CachedGenerator, CacheTiers) {
        let tiers = CacheTiers::default();
        let wrapper = CachedGenerator::new(generator.clone(), tiers.medium().clone());
        (wrapper, tiers)
    }

    fn shout(prompt: &str) -> String {
        prompt.to_uppercase()
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let generator = Arc::new(ScriptedGenerator::replying("remote answer"));
        let (wrapper, tiers) = wrapper(&generator);

        let first = wrapper.call("prompt", CallOptions::default()).await.unwrap();
        let second = wrapper.call("prompt", CallOptions::default()).await.unwrap();

        assert_eq!(first, "remote answer");
        assert_eq!(second, "remote answer");
        assert_eq!(generator.calls(), 1);
        assert_eq!(tiers.medium().read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_without_cache_always_calls() {
        let generator = Arc::new(ScriptedGenerator::replying("answer"));
        let (wrapper, tiers) = wrapper(&generator);

        let options = CallOptions::default().without_cache();
        wrapper.call("prompt", options).await.unwrap();
        wrapper.call("prompt", options).await.unwrap();

        assert_eq!(generator.calls(), 2);
        assert!(tiers.medium().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_returns_fallback_output() {
        let generator = Arc::new(ScriptedGenerator::failing());
        let (wrapper, tiers) = wrapper(&generator);

        let options = CallOptions::default().with_fallback(&shout);
        let result = wrapper.call("make me loud", options).await.unwrap();

        assert_eq!(result, shout("make me loud"));
        // Fallback answers are not cached
        assert!(tiers.medium().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_without_fallback_propagates() {
        let generator = Arc::new(ScriptedGenerator::failing());
        let (wrapper, _tiers) = wrapper(&generator);

        let result = wrapper.call("prompt", CallOptions::default()).await;

        assert!(matches!(result, Err(AssistError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_cached_entry_honours_ttl() {
        let generator = Arc::new(ScriptedGenerator::replying("answer"));
        let (wrapper, _tiers) = wrapper(&generator);

        let options = CallOptions::default().with_ttl(Duration::from_millis(30));
        wrapper.call("prompt", options).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        wrapper.call("prompt", options).await.unwrap();

        assert_eq!(generator.calls(), 2);
    }
}
