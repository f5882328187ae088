//! In-memory storage backend.
//!
//! Stores every table as rows in `Arc<RwLock<_>>` maps. Data is not
//! persisted and is lost when the store is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use haven::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::with_demo_data()?;
//! ```

mod store;

pub use store::InMemoryStore;
