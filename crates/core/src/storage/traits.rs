use async_trait::async_trait;

use super::{Entity, Filter, Query, Result, Row};

/// Row-level access to the relational store.
///
/// Mirrors what a PostgREST-style API offers: filtered selects with column
/// projection, bulk inserts returning the stored rows, and filtered
/// updates/deletes returning how many rows they touched.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Selects rows of `query.entity` matching every filter.
    async fn select(&self, query: &Query) -> Result<Vec<Row>>;

    /// Inserts rows and returns them as stored (with generated ids).
    async fn insert(&self, entity: Entity, rows: Vec<Row>) -> Result<Vec<Row>>;

    /// Applies `changes` to every row matching `filters`.
    async fn update(&self, entity: Entity, filters: &[Filter], changes: Row) -> Result<u64>;

    /// Deletes every row matching `filters`.
    async fn delete(&self, entity: Entity, filters: &[Filter]) -> Result<u64>;
}
