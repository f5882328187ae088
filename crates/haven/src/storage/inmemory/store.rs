//! In-memory data store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use haven_core::admin::{demo_bookings, demo_hotels, demo_rooms};
use haven_core::storage::{
    encode_row, DataStore, Entity, Filter, Query, RepositoryError, Result, Row,
};

/// One table: rows keyed by their `id` column.
#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Row>,
    next_id: i64,
}

impl Table {
    fn insert(&mut self, mut row: Row) -> Result<Row> {
        let id = match row.get("id").and_then(Value::as_i64) {
            Some(id) if id > 0 => id,
            _ => {
                self.next_id += 1;
                self.next_id
            }
        };
        if self.rows.contains_key(&id) {
            return Err(RepositoryError::InvalidData(format!(
                "duplicate id {id}"
            )));
        }
        self.next_id = self.next_id.max(id);
        row.insert("id".to_string(), Value::from(id));
        self.rows.insert(id, row.clone());
        Ok(row)
    }
}

fn matches_all(filters: &[Filter], row: &Row) -> bool {
    filters.iter().all(|f| f.matches(row))
}

/// In-memory [`DataStore`] for development and tests.
///
/// Ids are assigned per table from a counter that starts after the highest
/// id seen, like a serial column.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<Entity, Table>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the demo hotels, rooms and bookings.
    pub fn with_demo_data() -> Result<Self> {
        let mut tables = HashMap::new();
        seed(&mut tables, Entity::Hotels, demo_hotels().iter().map(encode_row))?;
        seed(&mut tables, Entity::Rooms, demo_rooms().iter().map(encode_row))?;
        seed(&mut tables, Entity::Bookings, demo_bookings().iter().map(encode_row))?;

        Ok(Self {
            tables: Arc::new(RwLock::new(tables)),
        })
    }
}

fn seed(
    tables: &mut HashMap<Entity, Table>,
    entity: Entity,
    rows: impl Iterator<Item = Result<Row>>,
) -> Result<()> {
    let table = tables.entry(entity).or_default();
    for row in rows {
        table.insert(row?)?;
    }
    Ok(())
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(&query.entity) else {
            return Ok(Vec::new());
        };

        Ok(table
            .rows
            .values()
            .filter(|row| query.matches(row))
            .map(|row| query.project(row))
            .collect())
    }

    async fn insert(&self, entity: Entity, rows: Vec<Row>) -> Result<Vec<Row>> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(entity).or_default();
        rows.into_iter().map(|row| table.insert(row)).collect()
    }

    async fn update(&self, entity: Entity, filters: &[Filter], changes: Row) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(&entity) else {
            return Ok(0);
        };

        let mut updated = 0;
        for row in table.rows.values_mut().filter(|row| matches_all(filters, row)) {
            for (column, value) in &changes {
                if column != "id" {
                    row.insert(column.clone(), value.clone());
                }
            }
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, entity: Entity, filters: &[Filter]) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(&entity) else {
            return Ok(0);
        };

        let before = table.rows.len();
        table.rows.retain(|_, row| !matches_all(filters, row));
        Ok((before - table.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::admin::{HotelRecord, DEMO_OWNER};
    use haven_core::storage::decode_rows;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[tokio::test]
    async fn test_demo_data_is_seeded() {
        let store = InMemoryStore::with_demo_data().unwrap();

        let hotels = store
            .select(&Query::table(Entity::Hotels).eq("owner_id", DEMO_OWNER))
            .await
            .unwrap();
        let hotels: Vec<HotelRecord> = decode_rows(hotels).unwrap();

        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].name, "The Royal Lake Palace");
    }

    #[tokio::test]
    async fn test_select_filters_and_projects() {
        let store = InMemoryStore::with_demo_data().unwrap();

        let rooms = store
            .select(
                &Query::table(Entity::Rooms)
                    .select(&["id", "room_type"])
                    .is_in("hotel_id", [1]),
            )
            .await
            .unwrap();

        assert_eq!(rooms.len(), 2);
        assert_eq!(Value::Object(rooms[0].clone()), json!({ "id": 1, "room_type": "Lake View" }));
    }

    #[tokio::test]
    async fn test_select_unknown_table_is_empty() {
        let store = InMemoryStore::new();
        let rows = store.select(&Query::table(Entity::Bookings)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_after_seed() {
        let store = InMemoryStore::with_demo_data().unwrap();

        let inserted = store
            .insert(
                Entity::Hotels,
                vec![row(json!({
                    "name": "Hill Retreat",
                    "city": "Munnar",
                    "owner_id": "admin-7",
                }))],
            )
            .await
            .unwrap();

        assert_eq!(inserted[0].get("id"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = InMemoryStore::with_demo_data().unwrap();

        let result = store
            .insert(Entity::Hotels, vec![row(json!({ "id": 1, "name": "dup" }))])
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_update_changes_matching_rows_but_not_ids() {
        let store = InMemoryStore::with_demo_data().unwrap();
        let filters = [Filter::Eq("id".into(), json!(2))];

        let updated = store
            .update(Entity::Hotels, &filters, row(json!({ "id": 99, "name": "Renamed" })))
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let rows = store
            .select(&Query::table(Entity::Hotels).eq("id", 2))
            .await
            .unwrap();
        assert_eq!(rows[0].get("name"), Some(&json!("Renamed")));
    }

    #[tokio::test]
    async fn test_delete_matching_rows() {
        let store = InMemoryStore::with_demo_data().unwrap();

        let deleted = store
            .delete(Entity::Rooms, &[Filter::Eq("hotel_id".into(), json!(1))])
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let remaining = store.select(&Query::table(Entity::Rooms)).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
