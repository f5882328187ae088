use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("TTL must be at least one second")]
    InvalidTtl,
}

impl CacheError {
    /// Returns true if the error means the backend could not serve the call.
    ///
    /// Only these errors count against backend health; serialization and
    /// TTL errors are local to a single value.
    pub fn is_backend_fault(&self) -> bool {
        matches!(
            self,
            CacheError::ConnectionFailed(_)
                | CacheError::OperationFailed(_)
                | CacheError::Timeout(_)
        )
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
