//! Serde helpers for the loosely typed payloads the dashboard and the data
//! store exchange.
//!
//! The dashboard posts forms where numbers arrive as strings and nested lists
//! arrive JSON-encoded; PostgREST returns `numeric` columns as strings.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an `f64` given either as a JSON number or a numeric string.
pub fn deserialize_flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!(
            "expected a number, got {other}"
        ))),
    }
}

/// Deserialize an optional record id.
///
/// Missing, empty, `0` and `"0"` all mean "no id", which the dashboard uses
/// to ask for a new record.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(
            n.as_i64()
                .ok_or_else(|| serde::de::Error::custom("id must be an integer"))?,
        ),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().parse().map_err(serde::de::Error::custom)?),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected an id, got {other}"
            )))
        }
    };
    Ok(id.filter(|id| *id != 0))
}

/// Deserialize a list given either as a JSON array or as a JSON-encoded
/// string. A string that does not parse yields an empty list.
pub fn deserialize_embedded_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(serde_json::from_str(&s).unwrap_or_default()),
        Some(value) => serde_json::from_value(value).map_err(serde::de::Error::custom),
    }
}
