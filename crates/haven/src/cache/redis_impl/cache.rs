//! Redis cache implementation.
//!
//! Values are stored with `SET EX`, so Redis expires them on its own; the
//! envelope freshness check on read covers any lag. Pattern deletion walks the
//! keyspace with `SCAN MATCH` and deletes in batches, which keeps the server
//! responsive but is best-effort: keys written during the scan may survive.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;

use haven_core::cache::{KeyStore, Result, Ttl};

use super::error::map_redis_error;

/// Keys per `DEL` while invalidating a pattern.
const DELETE_BATCH: usize = 500;

/// Redis cache backend using a lazily opened connection manager.
pub struct RedisCache {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisCache {
    /// Creates a Redis cache for `url` without connecting.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::OperationFailed` if the URL cannot be parsed.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    /// Returns the shared connection, opening it on first use.
    ///
    /// A failed attempt leaves the cell empty so the next call retries.
    async fn connection(&self) -> Result<ConnectionManager> {
        self.conn
            .get_or_try_init(|| async {
                let conn = ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(map_redis_error)?;
                tracing::info!("Connected to Redis");
                Ok(conn)
            })
            .await
            .cloned()
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;
        let mut iter = conn
            .scan_match::<_, String>(pattern)
            .await
            .map_err(map_redis_error)?;

        let mut keys = Vec::new();
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }
}

#[async_trait]
impl KeyStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        conn.get(key).await.map_err(map_redis_error)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Ttl) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await.map_err(map_redis_error)
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64> {
        let keys = self.scan(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection().await?;
        let mut removed = 0;
        for batch in keys.chunks(DELETE_BATCH) {
            let count: u64 = conn.del(batch).await.map_err(map_redis_error)?;
            removed += count;
        }
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Helper to get Redis URL from environment.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_cache() -> Option<RedisCache> {
        let cache = RedisCache::new(&redis_url()).ok()?;
        cache.connection().await.ok()?;
        Some(cache)
    }

    /// Unique prefix so parallel test runs never collide.
    fn test_prefix() -> String {
        format!("test:haven:{}", Uuid::new_v4())
    }

    fn ttl(secs: u64) -> Ttl {
        Ttl::from_secs(secs).unwrap()
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(RedisCache::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_redis_set_get_delete() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        let key = format!("{}:stats", test_prefix());

        cache.set(&key, b"hello", ttl(60)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"hello".to_vec()));

        cache.delete(&key).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_delete_matching() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        let prefix = test_prefix();
        let keep = format!("{prefix}:properties:43");

        cache.set(&format!("{prefix}:properties:42"), b"1", ttl(60)).await.unwrap();
        cache.set(&format!("{prefix}:properties:42:p=2"), b"2", ttl(60)).await.unwrap();
        cache.set(&keep, b"3", ttl(60)).await.unwrap();

        let removed = cache
            .delete_matching(&format!("{prefix}:properties:42*"))
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert!(cache.get(&keep).await.unwrap().is_some());
        cache.delete(&keep).await.unwrap();
    }
}
