//! TTL cache for successful upstream responses.
//!
//! [`ResponseCache`] stores decoded JSON payloads keyed by request identity
//! (route, endpoint and normalised query parameters). Each entry carries its
//! own time-to-live.
//!
//! # Expiry
//!
//! Expiry is lazy: an entry is valid while `now - stored_at < ttl`, and
//! [`get()`](ResponseCache::get) treats anything older as absent. A caller
//! cannot tell "never cached" from "expired"; both are a miss. Freshness is
//! judged on the tokio clock so it lines up with the rate limiter; moka's own
//! per-entry expiry reclaims the memory of stale entries in the background.
//!
//! # Capacity
//!
//! Unbounded by default. Long-running processes that see many distinct
//! players should set [`CacheConfig::max_entries`], which adds LRU eviction
//! on top of TTL expiry.
//!
//! # Sharing
//!
//! Like the rate limiter, one cache is meant to serve the whole process:
//! build it once and hand the same `Arc<ResponseCache>` to every client.
//! Concurrent misses on the same key are not de-duplicated; both callers go
//! upstream and the later `put` wins.

use std::sync::Arc;
use std::time::Duration;

use moka::Expiry;
use moka::future::Cache;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

/// Configuration for the response cache.
///
/// ```rust
/// # use riftwatch::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .ttl(Duration::from_secs(3600))
///     .max_entries(50_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for entries stored without an explicit TTL. Default: 24 hours.
    pub ttl: Duration,
    /// Optional LRU bound on the number of entries. Default: unbounded.
    pub max_entries: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_entries: None,
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default time-to-live.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Bound the cache to `n` entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = Some(n);
        self
    }
}

/// One cached payload.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    /// Entry stored now.
    pub fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Whether the entry is still valid at `now`.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }

    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }
}

/// Hands moka each entry's own TTL.
struct EntryTtl;

impl Expiry<String, Arc<CacheEntry>> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory response cache with per-entry TTL.
///
/// Internally synchronised; share it behind an `Arc`.
pub struct ResponseCache {
    entries: Cache<String, Arc<CacheEntry>>,
    default_ttl: Duration,
}

impl ResponseCache {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().expire_after(EntryTtl);
        if let Some(max) = config.max_entries {
            builder = builder.max_capacity(max);
        }
        Self {
            entries: builder.build(),
            default_ttl: config.ttl,
        }
    }

    /// TTL applied by [`insert()`](Self::insert).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a payload. Returns `None` on a miss or an expired entry.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key).await?;
        if entry.is_fresh_at(Instant::now()) {
            return Some(entry.value.clone());
        }
        debug!(key, age_ms = entry.age().as_millis() as u64, "dropping expired cache entry");
        self.entries.invalidate(key).await;
        None
    }

    /// Store a payload for `ttl`, replacing any previous entry.
    ///
    /// A zero TTL stores nothing.
    pub async fn put(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        self.entries
            .insert(key.into(), Arc::new(CacheEntry::new(value, ttl)))
            .await;
    }

    /// Store a payload with the configured default TTL.
    pub async fn insert(&self, key: impl Into<String>, value: Value) {
        self.put(key, value, self.default_ttl).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Approximate number of stored entries, stale ones included until reclaimed.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entry_fresh_strictly_before_ttl() {
        let entry = CacheEntry::new(Value::Null, Duration::from_secs(10));
        let t0 = entry.stored_at;
        assert!(entry.is_fresh_at(t0));
        assert!(entry.is_fresh_at(t0 + Duration::from_millis(9_999)));
        assert!(!entry.is_fresh_at(t0 + Duration::from_secs(10)));
        assert!(!entry.is_fresh_at(t0 + Duration::from_secs(11)));
    }

    #[test]
    fn config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(86_400));
        assert_eq!(config.max_entries, None);
    }
}
