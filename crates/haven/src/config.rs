use std::{env, time::Duration};

use haven_core::cache::Ttl;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Upper bound for a single cache backend call in milliseconds (default: 250)
    pub cache_op_timeout_ms: u64,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Base URL of the Supabase project, e.g. `https://xyz.supabase.co`
    /// Note: Only used when the `postgrest` feature is enabled.
    #[allow(dead_code)]
    pub supabase_url: Option<String>,
    /// Service role key, or the anon key when no service key is set.
    #[allow(dead_code)]
    pub supabase_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_OP_TIMEOUT_MS` - Cache call timeout (default: 250)
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `SUPABASE_URL` - PostgREST host
    /// - `SUPABASE_SERVICE_ROLE_KEY`, falling back to `SUPABASE_ANON_KEY`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            cache_ttl_seconds: non_empty("CACHE_TTL_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(300),
            cache_max_entries: non_empty("CACHE_MAX_ENTRIES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(10_000),
            cache_op_timeout_ms: non_empty("CACHE_OP_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(250),
            redis_url: non_empty("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            supabase_url: non_empty("SUPABASE_URL"),
            supabase_key: non_empty("SUPABASE_SERVICE_ROLE_KEY")
                .or_else(|| non_empty("SUPABASE_ANON_KEY")),
        }
    }

    /// Cache TTL; a zero setting falls back to the default.
    pub fn cache_ttl(&self) -> Ttl {
        Ttl::from_secs(self.cache_ttl_seconds).unwrap_or_default()
    }

    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_op_timeout_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_op_timeout(), Duration::from_millis(250));
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.supabase_url, None);
        assert_eq!(config.supabase_key, None);
    }

    #[test]
    fn test_cache_ttl_conversion() {
        let config = config_from(&[("CACHE_TTL_SECONDS", "600")]);
        assert_eq!(config.cache_ttl().as_secs(), 600);
    }

    #[test]
    fn test_zero_ttl_uses_default() {
        let config = config_from(&[("CACHE_TTL_SECONDS", "0")]);
        assert_eq!(config.cache_ttl(), Ttl::default());
    }

    #[test]
    fn test_unparseable_values_use_defaults() {
        let config = config_from(&[("CACHE_MAX_ENTRIES", "lots"), ("CACHE_OP_TIMEOUT_MS", "")]);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_op_timeout_ms, 250);
    }

    #[test]
    fn test_supabase_key_fallback() {
        let anon_only = config_from(&[("SUPABASE_ANON_KEY", "anon")]);
        assert_eq!(anon_only.supabase_key.as_deref(), Some("anon"));

        let both = config_from(&[
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]);
        assert_eq!(both.supabase_key.as_deref(), Some("service"));
    }
}
