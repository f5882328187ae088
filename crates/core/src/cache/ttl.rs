//! Entry lifetimes.
//!
//! The backend protocol carries TTLs as whole seconds, so a [`Ttl`] is a
//! non-zero second count. There is no way to build one that would store an
//! entry without a lifetime.

use std::num::NonZeroU64;
use std::time::Duration;

use super::{CacheError, Result};

/// Default lifetime of cached aggregates, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Time-to-live of a cache entry in whole seconds, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(NonZeroU64);

impl Ttl {
    /// Builds a TTL, rejecting zero.
    pub fn from_secs(secs: u64) -> Result<Self> {
        NonZeroU64::new(secs).map(Self).ok_or(CacheError::InvalidTtl)
    }

    /// Builds a TTL from a duration, rounding partial seconds up and
    /// clamping anything shorter than a second to one second.
    pub fn clamped(duration: Duration) -> Self {
        let secs = duration
            .as_secs()
            .saturating_add(u64::from(duration.subsec_nanos() > 0));
        Self(NonZeroU64::new(secs).unwrap_or(NonZeroU64::MIN))
    }

    pub fn as_secs(&self) -> u64 {
        self.0.get()
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0.get())
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::clamped(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}
