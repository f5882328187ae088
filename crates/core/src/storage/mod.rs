//! Data-store boundary.
//!
//! The relational store is an external collaborator. This module defines the
//! row-level interface the admin operations are written against; the server
//! crate provides an in-memory implementation and a PostgREST client.

mod error;
mod http_mapping;
mod query;
mod traits;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use query::{decode_rows, encode_row, Entity, Filter, Query, Row};
pub use traits::DataStore;
