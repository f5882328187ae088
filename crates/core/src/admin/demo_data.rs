//! Seed records for local development and tests.

use chrono::NaiveDate;

use super::records::{BookingRecord, HotelRecord, RoomRecord};

/// Owner of every seeded hotel.
pub const DEMO_OWNER: &str = "admin-7";

pub fn demo_hotels() -> Vec<HotelRecord> {
    vec![
        HotelRecord {
            id: 1,
            name: "The Royal Lake Palace".to_string(),
            city: "Udaipur, Rajasthan".to_string(),
            address: Some("Lake Pichola, Udaipur 313001".to_string()),
            image: Some(
                "https://images.unsplash.com/photo-1566073771259-6a8506099945".to_string(),
            ),
            owner_id: DEMO_OWNER.to_string(),
        },
        HotelRecord {
            id: 2,
            name: "Goa Beachfront Resort".to_string(),
            city: "Candolim, Goa".to_string(),
            address: Some("Candolim Beach Road, Goa 403515".to_string()),
            image: Some(
                "https://images.unsplash.com/photo-1520250497591-112f2f40a3f4".to_string(),
            ),
            owner_id: DEMO_OWNER.to_string(),
        },
    ]
}

pub fn demo_rooms() -> Vec<RoomRecord> {
    vec![
        RoomRecord {
            id: 1,
            hotel_id: 1,
            room_type: "Lake View".to_string(),
            price_per_night: 28000.0,
            max_guests: 2,
            is_available: true,
        },
        RoomRecord {
            id: 2,
            hotel_id: 1,
            room_type: "Royal Suite".to_string(),
            price_per_night: 55000.0,
            max_guests: 2,
            is_available: true,
        },
        RoomRecord {
            id: 3,
            hotel_id: 2,
            room_type: "Garden Villa".to_string(),
            price_per_night: 15000.0,
            max_guests: 4,
            is_available: true,
        },
    ]
}

pub fn demo_bookings() -> Vec<BookingRecord> {
    vec![
        booking(1001, 1, (2024, 5, 12), (2024, 5, 15), 84000.0, "Confirmed", "Arjun Kumar"),
        booking(1002, 3, (2024, 6, 1), (2024, 6, 4), 45000.0, "Pending", "Sarah Jenkins"),
        booking(1003, 2, (2024, 5, 20), (2024, 5, 21), 28000.0, "Confirmed", "Rahul Dravid"),
    ]
}

fn booking(
    id: i64,
    room_id: i64,
    check_in: (i32, u32, u32),
    check_out: (i32, u32, u32),
    total_price: f64,
    status: &str,
    guest: &str,
) -> BookingRecord {
    BookingRecord {
        id,
        room_id,
        check_in: NaiveDate::from_ymd_opt(check_in.0, check_in.1, check_in.2),
        check_out: NaiveDate::from_ymd_opt(check_out.0, check_out.1, check_out.2),
        total_price,
        status: status.to_string(),
        guest_name: Some(guest.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookings_reference_seeded_rooms() {
        let rooms = demo_rooms();
        for booking in demo_bookings() {
            assert!(rooms.iter().any(|r| r.id == booking.room_id));
        }
    }

    #[test]
    fn test_rooms_reference_seeded_hotels() {
        let hotels = demo_hotels();
        for room in demo_rooms() {
            assert!(hotels.iter().any(|h| h.id == room.hotel_id));
        }
    }
}
