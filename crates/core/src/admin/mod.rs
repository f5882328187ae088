//! Admin dashboard domain: stored records, response payloads, and the pure
//! functions that turn one into the other.

mod demo_data;
mod error;
mod operations;
mod records;
mod types;

pub use demo_data::{demo_bookings, demo_hotels, demo_rooms, DEMO_OWNER};
pub use error::{admin_error_to_status_code, AdminError};
pub use operations::{
    build_properties, build_property, compute_stats, enrich_bookings, is_confirmed, owned_by,
};
pub use records::{BookingRecord, HotelRecord, NewHotel, NewRoom, RoomRecord};
pub use types::{
    BookingStatusUpdate, BookingSummary, BookingsQuery, DashboardStats, Property, PropertyInput,
    RoomInput, RoomSummary, SaveOutcome,
};
