//! Pure dashboard computations over store records.
//!
//! The service layer loads the rows; everything here is synchronous and
//! side-effect free so the aggregates can be tested without a store.

use std::collections::HashMap;

use super::records::{BookingRecord, HotelRecord, RoomRecord};
use super::types::{BookingSummary, DashboardStats, Property, RoomSummary};
use crate::cache::CallerScope;

const UNKNOWN_PROPERTY: &str = "Unknown Property";
const UNKNOWN_ROOM: &str = "Unknown Room";

/// Booking statuses are stored with inconsistent casing.
pub fn is_confirmed(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("confirmed")
}

pub fn owned_by(hotel: &HotelRecord, scope: &CallerScope) -> bool {
    hotel.owner_id == scope.as_str()
}

/// Computes dashboard counters.
///
/// `bookings` must already be restricted to rooms of `hotels`.
pub fn compute_stats(hotels: &[HotelRecord], bookings: &[BookingRecord]) -> DashboardStats {
    let confirmed: Vec<&BookingRecord> = bookings
        .iter()
        .filter(|b| is_confirmed(&b.status))
        .collect();
    let revenue: f64 = confirmed.iter().map(|b| b.total_price).sum();

    DashboardStats {
        revenue: revenue.round() as i64,
        active_bookings: confirmed.len() as u64,
        total_properties: hotels.len() as u64,
    }
}

fn room_summary(room: &RoomRecord) -> RoomSummary {
    RoomSummary {
        id: room.id,
        room_type: room.room_type.clone(),
        price: room.price_per_night,
        capacity: room.max_guests,
        available: room.is_available,
    }
}

/// Builds a single property view from its hotel row and any rooms; rooms of
/// other hotels are ignored.
pub fn build_property(hotel: &HotelRecord, rooms: &[RoomRecord]) -> Property {
    Property {
        id: hotel.id,
        name: hotel.name.clone(),
        location: hotel.city.clone(),
        address: hotel.address.clone(),
        image_url: hotel.image.clone(),
        description: None,
        rooms: rooms
            .iter()
            .filter(|r| r.hotel_id == hotel.id)
            .map(room_summary)
            .collect(),
    }
}

/// Builds the property listing, in hotel order.
pub fn build_properties(hotels: &[HotelRecord], rooms: &[RoomRecord]) -> Vec<Property> {
    hotels
        .iter()
        .map(|hotel| {
            let mut property = build_property(hotel, rooms);
            property.description = Some(format!("{} rooms available", property.rooms.len()));
            property
        })
        .collect()
}

/// Joins bookings with their room and hotel names.
///
/// With a `status` filter only bookings whose status matches it
/// case-insensitively are kept. Dangling references fall back to
/// placeholder names instead of dropping the booking.
pub fn enrich_bookings(
    bookings: &[BookingRecord],
    rooms: &[RoomRecord],
    hotels: &[HotelRecord],
    status: Option<&str>,
) -> Vec<BookingSummary> {
    let rooms_by_id: HashMap<i64, &RoomRecord> = rooms.iter().map(|r| (r.id, r)).collect();
    let hotels_by_id: HashMap<i64, &HotelRecord> = hotels.iter().map(|h| (h.id, h)).collect();
    let status = status.map(str::trim).filter(|s| !s.is_empty());

    bookings
        .iter()
        .filter(|b| status.is_none_or(|s| b.status.trim().eq_ignore_ascii_case(s)))
        .map(|booking| {
            let room = rooms_by_id.get(&booking.room_id);
            let hotel = room.and_then(|r| hotels_by_id.get(&r.hotel_id));

            BookingSummary {
                id: booking.id,
                property_name: hotel
                    .map(|h| h.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PROPERTY.to_string()),
                room_type: room
                    .map(|r| r.room_type.clone())
                    .unwrap_or_else(|| UNKNOWN_ROOM.to_string()),
                check_in: booking.check_in,
                check_out: booking.check_out,
                amount: booking.total_price,
                status: booking.status.clone(),
                date: booking.check_in,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::demo_data::{demo_bookings, demo_hotels, demo_rooms, DEMO_OWNER};

    #[test]
    fn test_demo_stats() {
        let stats = compute_stats(&demo_hotels(), &demo_bookings());
        assert_eq!(
            stats,
            DashboardStats {
                revenue: 112000,
                active_bookings: 2,
                total_properties: 2,
            }
        );
    }

    #[test]
    fn test_stats_revenue_is_rounded() {
        let mut bookings = demo_bookings();
        bookings[0].total_price = 84000.6;
        let stats = compute_stats(&demo_hotels(), &bookings);
        assert_eq!(stats.revenue, 112001);
    }

    #[test]
    fn test_stats_with_no_data() {
        assert_eq!(compute_stats(&[], &[]), DashboardStats::default());
    }

    #[test]
    fn test_confirmed_is_case_insensitive() {
        assert!(is_confirmed("confirmed"));
        assert!(is_confirmed("Confirmed"));
        assert!(is_confirmed(" CONFIRMED "));
        assert!(!is_confirmed("pending"));
    }

    #[test]
    fn test_owned_by() {
        let hotel = &demo_hotels()[0];
        assert!(owned_by(hotel, &CallerScope::new(DEMO_OWNER).unwrap()));
        assert!(!owned_by(hotel, &CallerScope::new("admin-8").unwrap()));
    }

    #[test]
    fn test_properties_listing_describes_rooms() {
        let properties = build_properties(&demo_hotels(), &demo_rooms());

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].rooms.len(), 2);
        assert_eq!(
            properties[0].description.as_deref(),
            Some("2 rooms available")
        );
        assert_eq!(
            properties[1].description.as_deref(),
            Some("1 rooms available")
        );
    }

    #[test]
    fn test_single_property_has_no_description() {
        let hotels = demo_hotels();
        let property = build_property(&hotels[1], &demo_rooms());

        assert_eq!(property.description, None);
        assert_eq!(property.location, "Candolim, Goa");
        assert_eq!(property.rooms.len(), 1);
        assert_eq!(property.rooms[0].room_type, "Garden Villa");
        assert_eq!(property.rooms[0].capacity, 4);
    }

    #[test]
    fn test_enrich_bookings_joins_names() {
        let summaries = enrich_bookings(&demo_bookings(), &demo_rooms(), &demo_hotels(), None);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].property_name, "The Royal Lake Palace");
        assert_eq!(summaries[0].room_type, "Lake View");
        assert_eq!(summaries[0].date, summaries[0].check_in);
        assert_eq!(summaries[1].property_name, "Goa Beachfront Resort");
    }

    #[test]
    fn test_enrich_bookings_status_filter() {
        let bookings = demo_bookings();
        let confirmed =
            enrich_bookings(&bookings, &demo_rooms(), &demo_hotels(), Some("CONFIRMED"));
        assert_eq!(confirmed.len(), 2);
        assert!(confirmed.iter().all(|b| is_confirmed(&b.status)));

        let blank = enrich_bookings(&bookings, &demo_rooms(), &demo_hotels(), Some("  "));
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn test_enrich_bookings_unknown_fallbacks() {
        let mut bookings = demo_bookings();
        bookings[0].room_id = 999;
        let summaries = enrich_bookings(&bookings[..1], &demo_rooms(), &[], None);

        assert_eq!(summaries[0].property_name, "Unknown Property");
        assert_eq!(summaries[0].room_type, "Unknown Room");
    }
}
