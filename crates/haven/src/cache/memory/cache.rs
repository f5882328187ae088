//! In-memory cache implementation with LRU eviction.
//!
//! Entries carry their own deadline and are dropped lazily when a read finds
//! them expired. Pattern deletion scans the whole map; the map is bounded by
//! `max_entries`, so the scan is too.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tokio::time::Instant;

use haven_core::cache::{pattern_matches, KeyStore, Result, Ttl};

/// A single cache entry with its expiration deadline.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Ttl) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl.as_duration(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// When `max_entries` is reached the least recently used entry is evicted.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` keys.
    ///
    /// A zero capacity is raised to one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl KeyStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // `LruCache::get` updates recency, so even reads need the write lock.
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Ttl) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64> {
        let mut store = self.store.write().await;
        let now = Instant::now();

        let matching: Vec<(String, bool)> = store
            .iter()
            .filter(|(key, _)| pattern_matches(pattern, key))
            .map(|(key, entry)| (key.clone(), entry.is_expired(now)))
            .collect();

        let mut live = 0;
        for (key, expired) in matching {
            store.pop(&key);
            if !expired {
                live += 1;
            }
        }
        Ok(live)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Default max entries for tests
    const TEST_MAX_ENTRIES: usize = 1000;

    fn ttl(secs: u64) -> Ttl {
        Ttl::from_secs(secs).unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("admin:stats:admin-7", b"stats", ttl(300)).await.unwrap();
        let result = cache.get("admin:stats:admin-7").await.unwrap();

        assert_eq!(result, Some(b"stats".to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        assert_eq!(cache.get("admin:stats:nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("k", b"old", ttl(300)).await.unwrap();
        cache.set("k", b"new", ttl(300)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("k", b"v", ttl(300)).await.unwrap();
        cache.delete("k").await.unwrap();
        cache.delete("never-set").await.unwrap();

        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.set("admin:stats:admin-7", b"v", ttl(300)).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get("admin:stats:admin-7").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("admin:stats:admin-7").await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_matching() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("admin:properties:42", b"1", ttl(300)).await.unwrap();
        cache.set("admin:properties:42:page=2", b"2", ttl(300)).await.unwrap();
        cache.set("admin:properties:43", b"3", ttl(300)).await.unwrap();
        cache.set("admin:stats:42", b"4", ttl(300)).await.unwrap();

        let removed = cache.delete_matching("admin:properties:42*").await.unwrap();

        assert_eq!(removed, 2);
        assert!(cache.get("admin:properties:42").await.unwrap().is_none());
        assert!(cache.get("admin:properties:42:page=2").await.unwrap().is_none());
        assert!(cache.get("admin:properties:43").await.unwrap().is_some());
        assert!(cache.get("admin:stats:42").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_matching_no_matches() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.set("admin:stats:admin-7", b"v", ttl(300)).await.unwrap();

        let removed = cache.delete_matching("admin:bookings:*").await.unwrap();

        assert_eq!(removed, 0);
        assert!(cache.get("admin:stats:admin-7").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_matching_counts_live_keys_only() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.set("admin:stats:a", b"v", ttl(1)).await.unwrap();
        cache.set("admin:stats:b", b"v", ttl(300)).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        let removed = cache.delete_matching("admin:stats:*").await.unwrap();

        assert_eq!(removed, 1);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(2);

        cache.set("a", b"1", ttl(300)).await.unwrap();
        cache.set("b", b"2", ttl(300)).await.unwrap();
        cache.get("a").await.unwrap();
        cache.set("c", b"3", ttl(300)).await.unwrap();

        assert!(cache.get("a").await.unwrap().is_some());
        assert!(cache.get("b").await.unwrap().is_none());
        assert!(cache.get("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_still_stores() {
        let cache = MemoryCache::new(0);
        cache.set("k", b"v", ttl(300)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
