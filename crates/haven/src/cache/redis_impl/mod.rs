//! Redis cache backend implementation.
//!
//! Provides a shared cache for multi-instance deployments. The connection is
//! opened on first use so the server starts even while Redis is down.

mod cache;
mod error;

pub use cache::RedisCache;
