//! Cache keying, pattern matching and storage contracts.
//!
//! The server crate plugs concrete backends in through [`KeyStore`]; this
//! module only decides what a key looks like, which keys a pattern covers,
//! and how a cached value is framed on the wire.

mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;
mod ttl;

pub use error::{CacheError, Result};
pub use keys::{
    derive_key, scope_pattern, CacheKey, CacheNamespace, CallerScope, KeyDerivationError,
    RequestParams, KEY_PREFIX,
};
pub use patterns::{pattern_matches, InvalidationPattern};
pub use serialization::{decode_entry, encode_entry, CacheEnvelope, SerializationError};
pub use traits::KeyStore;
pub use ttl::{Ttl, DEFAULT_TTL_SECS};
