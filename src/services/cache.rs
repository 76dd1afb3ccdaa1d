use crate::models::{Recommendation, UserProfile};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// In-memory cache of LLM recommendations
///
/// Entries expire after the configured TTL. Keys embed a fingerprint of the
/// profile, so an edited profile never reads a stale answer.
pub struct RecommendationCache {
    cache: moka::future::Cache<String, Recommendation>,
}

impl RecommendationCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &str) -> Option<Recommendation> {
        let hit = self.cache.get(key).await;
        tracing::trace!("Recommendation cache {}: {}", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    pub async fn insert(&self, key: String, recommendation: Recommendation) {
        self.cache.insert(key, recommendation).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a profile's recommendation
    pub fn recommendation(profile: &UserProfile) -> String {
        format!(
            "recommendation:{}:{:016x}",
            profile.email_key(),
            profile_fingerprint(profile)
        )
    }
}

/// Hash of the profile content, ignoring bookkeeping timestamps
fn profile_fingerprint(profile: &UserProfile) -> u64 {
    let mut content = profile.clone();
    content.created_at = None;
    content.updated_at = None;

    let mut hasher = DefaultHasher::new();
    serde_json::to_vec(&content)
        .unwrap_or_default()
        .hash(&mut hasher);
    hasher.finish()
}
