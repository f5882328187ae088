//! Application state.
//!
//! Holds the admin service and the cache front it uses. The data store and
//! cache backend are trait objects chosen by feature flags in [`AppState::new`];
//! tests assemble their own with [`AppState::from_parts`].

use std::sync::Arc;

use haven_core::cache::KeyStore;
use haven_core::storage::DataStore;

use crate::cache::{CacheAside, ResilientStore};
use crate::config::Config;
use crate::service::AdminService;

/// Shared application state.
///
/// Cloned for each request handler; everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub admin: AdminService,
    pub cache: CacheAside,
}

impl AppState {
    /// Creates the state for the backends selected at compile time.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let store = build_store(config)?;
        let key_store = build_key_store(config)?;

        tracing::info!(
            cache_backend = key_store.backend_name(),
            ttl_secs = config.cache_ttl().as_secs(),
            op_timeout_ms = config.cache_op_timeout_ms,
            "Cache configured"
        );

        Ok(Self::from_parts(store, key_store, config))
    }

    /// Creates the state around explicit backends.
    pub fn from_parts(
        store: Arc<dyn DataStore>,
        key_store: Arc<dyn KeyStore>,
        config: &Config,
    ) -> Self {
        let resilient = Arc::new(ResilientStore::new(key_store, config.cache_op_timeout()));
        let cache = CacheAside::new(resilient, config.cache_ttl());

        Self {
            admin: AdminService::new(store, cache.clone()),
            cache,
        }
    }
}

// ============================================================================
// Backend factories
// ============================================================================

#[cfg(feature = "inmemory")]
fn build_store(_config: &Config) -> anyhow::Result<Arc<dyn DataStore>> {
    use crate::storage::inmemory::InMemoryStore;

    tracing::info!("Using in-memory data store with demo data");
    Ok(Arc::new(InMemoryStore::with_demo_data()?))
}

#[cfg(feature = "postgrest")]
fn build_store(config: &Config) -> anyhow::Result<Arc<dyn DataStore>> {
    use anyhow::Context;

    use crate::storage::postgrest::PostgrestStore;

    let url = config
        .supabase_url
        .as_deref()
        .context("SUPABASE_URL must be set for the postgrest backend")?;
    let key = config
        .supabase_key
        .as_deref()
        .context("SUPABASE_SERVICE_ROLE_KEY or SUPABASE_ANON_KEY must be set")?;

    tracing::info!(url, "Using PostgREST data store");
    Ok(Arc::new(PostgrestStore::new(url, key)))
}

#[cfg(feature = "memory")]
fn build_key_store(config: &Config) -> anyhow::Result<Arc<dyn KeyStore>> {
    use crate::cache::memory::MemoryCache;

    Ok(Arc::new(MemoryCache::new(config.cache_max_entries)))
}

#[cfg(feature = "redis")]
fn build_key_store(config: &Config) -> anyhow::Result<Arc<dyn KeyStore>> {
    use crate::cache::redis_impl::RedisCache;

    Ok(Arc::new(RedisCache::new(&config.redis_url)?))
}

#[cfg(test)]
impl AppState {
    /// In-memory demo store with the in-memory cache.
    pub fn for_tests() -> Self {
        use crate::cache::memory::MemoryCache;
        use crate::storage::inmemory::InMemoryStore;

        let store = InMemoryStore::with_demo_data().expect("demo data should encode");
        Self::from_parts(
            Arc::new(store),
            Arc::new(MemoryCache::new(1_000)),
            &Config::default(),
        )
    }
}
