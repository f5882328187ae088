//! Cache entry framing.
//!
//! Every cached value is stored inside a [`CacheEnvelope`] carrying the time
//! it was stored and its TTL. Readers check freshness themselves, so an entry
//! never outlives its TTL as an answer even when the backend evicts late.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use super::{CacheError, Ttl};

/// Errors that can occur while framing values for the cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// A cached value with its insertion time and lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    pub stored_at: DateTime<Utc>,
    pub ttl_secs: u64,
    pub value: T,
}

impl<T> CacheEnvelope<T> {
    pub fn new(value: T, ttl: Ttl, stored_at: DateTime<Utc>) -> Self {
        Self {
            stored_at,
            ttl_secs: ttl.as_secs(),
            value,
        }
    }

    /// Returns true while `now` is before `stored_at + ttl`.
    ///
    /// An envelope stamped in the future (clock skew between instances) is
    /// treated as just stored.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.stored_at);
        if age < TimeDelta::zero() {
            return true;
        }
        let age_ms = u128::try_from(age.num_milliseconds()).unwrap_or(0);
        age_ms < u128::from(self.ttl_secs) * 1000
    }
}

/// Frames and serializes a value for storage.
pub fn encode_entry<T: Serialize>(
    value: &T,
    ttl: Ttl,
    stored_at: DateTime<Utc>,
) -> Result<Vec<u8>, SerializationError> {
    let envelope = CacheEnvelope::new(value, ttl, stored_at);
    serde_json::to_vec(&envelope).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes a framed value read from storage.
pub fn decode_entry<T: DeserializeOwned>(
    bytes: &[u8],
) -> Result<CacheEnvelope<T>, SerializationError> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
