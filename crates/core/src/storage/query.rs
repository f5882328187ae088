//! Query description and row conversions.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::{RepositoryError, Result};

/// A row as returned by the store: column name to JSON value.
pub type Row = Map<String, Value>;

/// Tables the admin backend reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Hotels,
    Rooms,
    Bookings,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Hotels => "hotels",
            Entity::Rooms => "rooms",
            Entity::Bookings => "bookings",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq(String, Value),
    /// `column IN (values)`; an empty list matches nothing.
    In(String, Vec<Value>),
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _) | Filter::In(column, _) => column,
        }
    }

    /// Evaluates the predicate against a row. Missing columns never match.
    pub fn matches(&self, row: &Row) -> bool {
        let Some(actual) = row.get(self.column()) else {
            return false;
        };
        match self {
            Filter::Eq(_, expected) => values_equal(actual, expected),
            Filter::In(_, candidates) => candidates.iter().any(|c| values_equal(actual, c)),
        }
    }
}

/// Numbers compare by value so `1` and `1.0` are the same id.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// A projected, filtered select against one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub entity: Entity,
    /// Columns to return; empty means every column.
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
}

impl Query {
    pub fn table(entity: Entity) -> Self {
        Self {
            entity,
            columns: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.into(), value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filters.push(Filter::In(
            column.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Returns true if `row` passes every filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Keeps only the projected columns of `row`.
    pub fn project(&self, row: &Row) -> Row {
        if self.columns.is_empty() {
            return row.clone();
        }
        self.columns
            .iter()
            .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
            .collect()
    }
}

/// Decodes store rows into typed records.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row))
                .map_err(|e| RepositoryError::Serialization(e.to_string()))
        })
        .collect()
}

/// Encodes a typed record as a store row.
pub fn encode_row<T: Serialize>(value: &T) -> Result<Row> {
    match serde_json::to_value(value) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(RepositoryError::InvalidData(format!(
            "expected an object, got {other}"
        ))),
        Err(e) => Err(RepositoryError::Serialization(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_eq_filter() {
        let hotel = row(json!({ "id": 1, "owner_id": "admin-7" }));
        assert!(Filter::Eq("owner_id".into(), json!("admin-7")).matches(&hotel));
        assert!(!Filter::Eq("owner_id".into(), json!("admin-8")).matches(&hotel));
        assert!(Filter::Eq("id".into(), json!(1.0)).matches(&hotel));
        assert!(!Filter::Eq("missing".into(), json!(1)).matches(&hotel));
    }

    #[test]
    fn test_in_filter() {
        let room = row(json!({ "hotel_id": 2 }));
        assert!(Filter::In("hotel_id".into(), vec![json!(1), json!(2)]).matches(&room));
        assert!(!Filter::In("hotel_id".into(), vec![json!(3)]).matches(&room));
        assert!(!Filter::In("hotel_id".into(), vec![]).matches(&room));
    }

    #[test]
    fn test_query_builder_and_projection() {
        let query = Query::table(Entity::Rooms)
            .select(&["id", "hotel_id"])
            .is_in("hotel_id", [1, 2])
            .eq("is_available", true);

        let available = row(json!({ "id": 10, "hotel_id": 2, "is_available": true, "price": 5 }));
        let taken = row(json!({ "id": 11, "hotel_id": 2, "is_available": false }));

        assert!(query.matches(&available));
        assert!(!query.matches(&taken));
        assert_eq!(
            Value::Object(query.project(&available)),
            json!({ "id": 10, "hotel_id": 2 })
        );
    }

    #[test]
    fn test_empty_projection_keeps_all_columns() {
        let query = Query::table(Entity::Hotels);
        let hotel = row(json!({ "id": 1, "name": "x" }));
        assert_eq!(query.project(&hotel), hotel);
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        id: i64,
        name: String,
    }

    #[test]
    fn test_decode_and_encode_rows() {
        let rows = vec![row(json!({ "id": 1, "name": "a" }))];
        let decoded: Vec<Sample> = decode_rows(rows).unwrap();
        assert_eq!(
            decoded,
            vec![Sample {
                id: 1,
                name: "a".into()
            }]
        );

        let encoded = encode_row(&decoded[0]).unwrap();
        assert_eq!(encoded.get("name"), Some(&json!("a")));
    }

    #[test]
    fn test_decode_bad_row_is_serialization_error() {
        let rows = vec![row(json!({ "id": "not-a-number" }))];
        let result: Result<Vec<Sample>> = decode_rows(rows);
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn test_encode_non_object_is_invalid() {
        assert!(matches!(
            encode_row(&42),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_entity_names() {
        assert_eq!(Entity::Hotels.to_string(), "hotels");
        assert_eq!(Entity::Rooms.as_str(), "rooms");
        assert_eq!(Entity::Bookings.as_str(), "bookings");
    }
}
