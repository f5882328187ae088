//! Read-through / write-invalidate protocol.
//!
//! - **Reads**: look the key up; a fresh entry is returned as is, otherwise the
//!   loader runs and a successful result is stored with the requested TTL.
//! - **Writes**: the caller commits the mutation first, then invalidates the
//!   affected keys and patterns.
//!
//! Loader errors are returned untouched and never cached. Concurrent misses on
//! the same key may each run the loader; the last store wins.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use haven_core::cache::{decode_entry, encode_entry, CacheKey, InvalidationPattern, Ttl};

use super::resilient::{CacheHealth, ResilientStore};

/// Cache-aside front for expensive reads.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<ResilientStore>,
    default_ttl: Ttl,
}

impl CacheAside {
    pub fn new(store: Arc<ResilientStore>, default_ttl: Ttl) -> Self {
        Self { store, default_ttl }
    }

    pub fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    pub fn health(&self) -> CacheHealth {
        self.store.health()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Returns the cached value for `key`, or runs `loader` and caches its
    /// result for `ttl`.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Ttl,
        loader: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        let value = loader().await?;
        self.store_value(key, &value, ttl).await;
        Ok(value)
    }

    /// Drops every key matching any of `patterns`. Returns how many went.
    pub async fn invalidate(&self, patterns: &[InvalidationPattern]) -> u64 {
        let mut removed = 0;
        for pattern in patterns {
            let count = self.store.delete_matching(pattern.as_str()).await;
            tracing::debug!(pattern = %pattern, removed = count, "Cache invalidated");
            removed += count;
        }
        removed
    }

    /// Drops exactly one key.
    pub async fn invalidate_key(&self, key: &CacheKey) {
        if self.store.delete(key.as_str()).await {
            tracing::debug!(key = %key, "Cache key invalidated");
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let Some(bytes) = self.store.get(key.as_str()).await else {
            tracing::trace!(key = %key, "Cache miss");
            return None;
        };

        match decode_entry::<T>(&bytes) {
            Ok(entry) if entry.is_fresh_at(Utc::now()) => {
                tracing::trace!(key = %key, "Cache hit");
                Some(entry.value)
            }
            Ok(_) => {
                tracing::trace!(key = %key, "Cache entry expired");
                None
            }
            Err(err) => {
                // Treated as a miss; the reload overwrites it.
                tracing::warn!(key = %key, error = %err, "Cached value could not be decoded");
                None
            }
        }
    }

    async fn store_value<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Ttl) {
        match encode_entry(value, ttl, Utc::now()) {
            Ok(bytes) => {
                if self.store.set(key.as_str(), &bytes, ttl).await {
                    tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached value stored");
                }
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Value could not be cached");
            }
        }
    }
}
