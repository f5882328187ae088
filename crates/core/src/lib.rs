//! Core of the HorizonHaven admin backend.
//!
//! Everything in this crate is free of I/O: cache key derivation and glob
//! matching, cache entry envelopes, the admin domain types with the pure
//! functions that shape data-store rows into dashboard payloads, and the
//! trait boundaries (`KeyStore`, `DataStore`) implemented by the server crate.

pub mod admin;
pub mod cache;
pub mod serde;
pub mod storage;
