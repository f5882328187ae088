//! Data store implementations.
//!
//! This module provides concrete implementations of the
//! [`DataStore`](haven_core::storage::DataStore) trait. The implementation is
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): seeded in-process tables, for development and tests
//! - `postgrest`: Supabase / PostgREST over HTTP using `reqwest`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build against Supabase:
//! ```bash
//! cargo build -p haven --no-default-features --features postgrest,memory
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "inmemory", feature = "postgrest"))]
compile_error!(
    "Features 'inmemory' and 'postgrest' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "postgrest")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'postgrest' feature. \
    Example: cargo build -p haven --features inmemory"
);

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "postgrest")]
pub mod postgrest;
