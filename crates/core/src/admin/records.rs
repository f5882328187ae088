//! Rows as stored in the relational data store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::serde::deserialize_flexible_f64;

/// A hotel (property) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub id: i64,
    pub name: String,
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub owner_id: String,
}

impl HotelRecord {
    pub const COLUMNS: &'static [&'static str] =
        &["id", "name", "city", "address", "image", "owner_id"];
}

/// A room row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: i64,
    pub hotel_id: i64,
    pub room_type: String,
    #[serde(deserialize_with = "deserialize_flexible_f64")]
    pub price_per_night: f64,
    pub max_guests: u32,
    pub is_available: bool,
}

impl RoomRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "hotel_id",
        "room_type",
        "price_per_night",
        "max_guests",
        "is_available",
    ];
}

/// A booking row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: i64,
    pub room_id: i64,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    /// PostgREST returns `numeric` columns as strings.
    #[serde(deserialize_with = "deserialize_flexible_f64")]
    pub total_price: f64,
    pub status: String,
    #[serde(default)]
    pub guest_name: Option<String>,
}

impl BookingRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "room_id",
        "check_in",
        "check_out",
        "total_price",
        "status",
        "guest_name",
    ];
}

/// Insert payload for a hotel; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewHotel {
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub image: Option<String>,
    pub owner_id: String,
}

/// Insert payload for a room; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRoom {
    pub hotel_id: i64,
    pub room_type: String,
    pub price_per_night: f64,
    pub max_guests: u32,
    pub is_available: bool,
}
