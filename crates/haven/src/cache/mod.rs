//! Cache layer of the admin backend.
//!
//! - [`ResilientStore`] is the single fault boundary around the backend;
//! - [`CacheAside`] implements read-through and write-invalidate on top of it;
//! - `memory` and `redis_impl` are the [`KeyStore`](haven_core::cache::KeyStore)
//!   backends, selected at compile time.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory LRU cache
//! - `redis`: Redis cache using the redis crate
//!
//! These features are mutually exclusive - only one cache backend can be
//! enabled at a time.

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p haven --features memory"
);

mod aside;
mod resilient;

#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(test)]
pub mod testing;

pub use aside::CacheAside;
pub use resilient::{CacheHealth, ResilientStore};
