//! Fault boundary around the cache backend.
//!
//! Every backend call goes through [`ResilientStore`], which bounds it with a
//! timeout and converts any failure into "absent" for reads and a logged
//! no-op for writes. The store keeps a two-state health flag:
//!
//! - `Available`: the last backend call succeeded;
//! - `Degraded`: the last backend call failed or timed out.
//!
//! Calls are still attempted while degraded, so the first successful call
//! after an outage flips the state back without a separate health check.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use haven_core::cache::{CacheError, KeyStore, Result, Ttl};

/// Observed health of the cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHealth {
    Available,
    Degraded,
}

/// A [`KeyStore`] wrapper that never surfaces backend failures.
pub struct ResilientStore {
    inner: Arc<dyn KeyStore>,
    op_timeout: Duration,
    degraded: AtomicBool,
}

impl ResilientStore {
    pub fn new(inner: Arc<dyn KeyStore>, op_timeout: Duration) -> Self {
        Self {
            inner,
            op_timeout,
            degraded: AtomicBool::new(false),
        }
    }

    pub fn health(&self) -> CacheHealth {
        if self.degraded.load(Ordering::Acquire) {
            CacheHealth::Degraded
        } else {
            CacheHealth::Available
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    /// Returns the stored bytes, or `None` on a miss or any failure.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.guard("get", key, self.inner.get(key)).await.flatten()
    }

    /// Stores a value. Returns whether the backend accepted it.
    pub async fn set(&self, key: &str, value: &[u8], ttl: Ttl) -> bool {
        self.guard("set", key, self.inner.set(key, value, ttl))
            .await
            .is_some()
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.guard("delete", key, self.inner.delete(key))
            .await
            .is_some()
    }

    /// Deletes every key matching `pattern`; failures count as zero.
    pub async fn delete_matching(&self, pattern: &str) -> u64 {
        self.guard("delete_matching", pattern, self.inner.delete_matching(pattern))
            .await
            .unwrap_or(0)
    }

    async fn guard<T>(
        &self,
        operation: &'static str,
        target: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Option<T> {
        let outcome = match tokio::time::timeout(self.op_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        };

        match outcome {
            Ok(value) => {
                self.mark_available();
                Some(value)
            }
            Err(err) if err.is_backend_fault() => {
                self.mark_degraded(operation, target, &err);
                None
            }
            Err(err) => {
                // The backend answered; the request itself was bad.
                tracing::warn!(operation, key = %target, error = %err, "Cache call rejected");
                None
            }
        }
    }

    fn mark_available(&self) {
        if self.degraded.swap(false, Ordering::AcqRel) {
            tracing::info!(backend = self.backend_name(), "Cache backend recovered");
        }
    }

    fn mark_degraded(&self, operation: &'static str, target: &str, err: &CacheError) {
        if self.degraded.swap(true, Ordering::AcqRel) {
            tracing::debug!(
                operation,
                key = %target,
                error = %err,
                "Cache backend still unavailable"
            );
        } else {
            tracing::warn!(
                backend = self.backend_name(),
                operation,
                key = %target,
                error = %err,
                "Cache backend unavailable, serving from the data store"
            );
        }
    }
}
