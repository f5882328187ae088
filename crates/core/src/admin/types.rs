//! Dashboard request and response payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AdminError;
use crate::serde::{
    deserialize_embedded_list, deserialize_flexible_f64, deserialize_optional_id,
    deserialize_optional_string,
};

/// Headline numbers for the dashboard landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of confirmed bookings, rounded to whole currency units.
    pub revenue: i64,
    pub active_bookings: u64,
    pub total_properties: u64,
}

/// A room as shown under a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    pub capacity: u32,
    pub available: bool,
}

/// A property with its rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub address: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rooms: Vec<RoomSummary>,
}

/// A booking enriched with the names of what was booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: i64,
    pub property_name: String,
    pub room_type: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub amount: f64,
    pub status: String,
    pub date: Option<NaiveDate>,
}

/// A room submitted with a new property.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoomInput {
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(deserialize_with = "deserialize_flexible_f64")]
    pub price: f64,
    pub capacity: u32,
}

/// Create-or-update payload for a property.
///
/// An absent or zero `id` creates a property; anything else updates it.
/// `rooms` is only used on creation and may be sent JSON-encoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_embedded_list")]
    pub rooms: Vec<RoomInput>,
}

impl PropertyInput {
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.name.trim().is_empty() {
            return Err(AdminError::InvalidInput("name is required".to_string()));
        }
        if self.location.trim().is_empty() {
            return Err(AdminError::InvalidInput("location is required".to_string()));
        }
        if let Some(room) = self.rooms.iter().find(|r| r.price < 0.0) {
            return Err(AdminError::InvalidInput(format!(
                "room {} has a negative price",
                room.room_type
            )));
        }
        Ok(())
    }
}

/// Status change for a booking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: String,
}

/// Query string of the booking listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookingsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub status: Option<String>,
}

/// Acknowledgement of a property write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub id: i64,
}
