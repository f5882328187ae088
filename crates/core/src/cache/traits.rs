use async_trait::async_trait;

use super::{Result, Ttl};

/// Key/value backend with TTLs and glob-pattern deletion.
///
/// Implementations report backend trouble as errors; callers that must not
/// fail on cache faults go through the server's fault boundary instead of
/// calling a store directly.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Gets the value stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &[u8], ttl: Ttl) -> Result<()>;

    /// Deletes the entry under `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes every live key matching `pattern` and returns how many were
    /// removed. Keys written while the deletion runs may or may not be caught.
    async fn delete_matching(&self, pattern: &str) -> Result<u64>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
