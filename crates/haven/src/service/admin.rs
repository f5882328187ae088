//! Admin dashboard operations with read-through caching.
//!
//! Reads derive a caller-scoped key and go through [`CacheAside`]; the loader
//! only runs on a miss. Writes commit to the [`DataStore`] first and then
//! invalidate every cached view that embeds the changed rows:
//!
//! | write                | invalidated                                  |
//! |----------------------|----------------------------------------------|
//! | create property      | properties, stats                            |
//! | update property      | property (exact key), properties, stats, bookings |
//! | delete property      | property (exact key), properties, stats, bookings |
//! | booking status       | bookings, stats                              |

use std::sync::Arc;

use haven_core::admin::{
    build_properties, build_property, compute_stats, enrich_bookings, owned_by, AdminError,
    BookingRecord, BookingStatusUpdate, BookingSummary, BookingsQuery, DashboardStats,
    HotelRecord, NewHotel, NewRoom, Property, PropertyInput, RoomInput, RoomRecord, SaveOutcome,
};
use haven_core::cache::{
    derive_key, scope_pattern, CacheKey, CacheNamespace, CallerScope, RequestParams,
};
use haven_core::storage::{
    decode_rows, encode_row, DataStore, Entity, Filter, Query, RepositoryError, Row,
};
use serde_json::{json, Value};

use crate::cache::CacheAside;

type Result<T> = std::result::Result<T, AdminError>;

/// Derives the key for `namespace` and hands back the scope it was derived
/// for. Fails closed without a caller.
fn scoped_key<'a>(
    namespace: CacheNamespace,
    scope: Option<&'a CallerScope>,
    params: &RequestParams,
) -> Result<(CacheKey, &'a CallerScope)> {
    let key = derive_key(namespace, scope, params)?;
    let scope = scope.ok_or(AdminError::Unauthorized)?;
    Ok((key, scope))
}

fn property_params(id: i64) -> RequestParams {
    RequestParams::new().with("id", id)
}

/// Admin operations over a data store, fronted by the cache.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn DataStore>,
    cache: CacheAside,
}

impl AdminService {
    pub fn new(store: Arc<dyn DataStore>, cache: CacheAside) -> Self {
        Self { store, cache }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Revenue, confirmed bookings, and property count for the caller.
    pub async fn stats(&self, scope: Option<&CallerScope>) -> Result<DashboardStats> {
        let (key, owner) = scoped_key(CacheNamespace::Stats, scope, &RequestParams::new())?;

        self.cache
            .read_through(&key, self.cache.default_ttl(), || async {
                let hotels = self.owned_hotels(owner).await?;
                let rooms = self.rooms_of(&hotels).await?;
                let bookings = self.bookings_of(&rooms).await?;
                Ok::<_, AdminError>(compute_stats(&hotels, &bookings))
            })
            .await
    }

    /// Every property of the caller with its rooms.
    pub async fn properties(&self, scope: Option<&CallerScope>) -> Result<Vec<Property>> {
        let (key, owner) = scoped_key(CacheNamespace::Properties, scope, &RequestParams::new())?;

        self.cache
            .read_through(&key, self.cache.default_ttl(), || async {
                let hotels = self.owned_hotels(owner).await?;
                let rooms = self.rooms_of(&hotels).await?;
                Ok::<_, AdminError>(build_properties(&hotels, &rooms))
            })
            .await
    }

    /// One property of the caller. Missing and foreign properties are both
    /// `Forbidden`.
    pub async fn property(&self, scope: Option<&CallerScope>, id: i64) -> Result<Property> {
        let (key, owner) = scoped_key(CacheNamespace::Property, scope, &property_params(id))?;

        self.cache
            .read_through(&key, self.cache.default_ttl(), || async {
                let hotel = self.owned_hotel(owner, id).await?;
                let rooms = self.rooms_of(std::slice::from_ref(&hotel)).await?;
                Ok::<_, AdminError>(build_property(&hotel, &rooms))
            })
            .await
    }

    /// Bookings across the caller's properties, optionally filtered by status.
    pub async fn bookings(
        &self,
        scope: Option<&CallerScope>,
        query: &BookingsQuery,
    ) -> Result<Vec<BookingSummary>> {
        // The filter ignores case, so the key does too.
        let status = query.status.as_deref().map(str::to_lowercase);
        let params = RequestParams::new().with_optional("status", status.as_deref());
        let (key, owner) = scoped_key(CacheNamespace::Bookings, scope, &params)?;

        self.cache
            .read_through(&key, self.cache.default_ttl(), || async {
                let hotels = self.owned_hotels(owner).await?;
                let rooms = self.rooms_of(&hotels).await?;
                let bookings = self.bookings_of(&rooms).await?;
                Ok::<_, AdminError>(enrich_bookings(&bookings, &rooms, &hotels, status.as_deref()))
            })
            .await
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Creates a property when `input.id` is absent, otherwise updates the
    /// caller's property with that id.
    pub async fn save_property(
        &self,
        scope: Option<&CallerScope>,
        input: PropertyInput,
    ) -> Result<SaveOutcome> {
        let owner = scope.ok_or(AdminError::Unauthorized)?;
        input.validate()?;

        match input.id {
            None => self.create_property(owner, input).await,
            Some(id) => self.update_property(owner, id, input).await,
        }
    }

    async fn create_property(
        &self,
        owner: &CallerScope,
        input: PropertyInput,
    ) -> Result<SaveOutcome> {
        let hotel = NewHotel {
            name: input.name.trim().to_string(),
            city: input.location.trim().to_string(),
            address: input.address,
            image: input.image_url,
            owner_id: owner.as_str().to_string(),
        };
        let inserted = self
            .store
            .insert(Entity::Hotels, vec![encode_row(&hotel)?])
            .await?;
        let hotel: HotelRecord = decode_rows(inserted)?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::QueryFailed("insert returned no hotel".into()))?;

        // The hotel is committed from here on, so listings are stale even if
        // the rooms fail.
        let rooms = self.insert_rooms(hotel.id, &input.rooms).await;
        self.cache
            .invalidate(&[
                scope_pattern(CacheNamespace::Properties, owner),
                scope_pattern(CacheNamespace::Stats, owner),
            ])
            .await;
        rooms?;

        tracing::debug!(
            hotel_id = hotel.id,
            owner = %owner,
            rooms = input.rooms.len(),
            "Property created"
        );
        Ok(SaveOutcome {
            success: true,
            id: hotel.id,
        })
    }

    async fn insert_rooms(&self, hotel_id: i64, rooms: &[RoomInput]) -> Result<()> {
        if rooms.is_empty() {
            return Ok(());
        }
        let rows = rooms
            .iter()
            .map(|room| {
                encode_row(&NewRoom {
                    hotel_id,
                    room_type: room.room_type.clone(),
                    price_per_night: room.price,
                    max_guests: room.capacity,
                    is_available: true,
                })
            })
            .collect::<std::result::Result<Vec<Row>, _>>()?;
        self.store.insert(Entity::Rooms, rows).await?;
        Ok(())
    }

    async fn update_property(
        &self,
        owner: &CallerScope,
        id: i64,
        input: PropertyInput,
    ) -> Result<SaveOutcome> {
        self.owned_hotel(owner, id).await?;

        // Optional columns the dashboard left out keep their stored values.
        let mut changes = row(json!({
            "name": input.name.trim(),
            "city": input.location.trim(),
        }));
        if let Some(address) = input.address {
            changes.insert("address".to_string(), Value::from(address));
        }
        if let Some(image) = input.image_url {
            changes.insert("image".to_string(), Value::from(image));
        }
        self.store
            .update(Entity::Hotels, &[id_filter(id)], changes)
            .await?;

        self.invalidate_property(owner, id).await;

        tracing::debug!(hotel_id = id, owner = %owner, "Property updated");
        Ok(SaveOutcome { success: true, id })
    }

    /// Deletes one of the caller's properties together with its rooms.
    ///
    /// Cached views are dropped even when the hotel delete fails after its
    /// rooms are gone.
    pub async fn delete_property(
        &self,
        scope: Option<&CallerScope>,
        id: i64,
    ) -> Result<SaveOutcome> {
        let owner = scope.ok_or(AdminError::Unauthorized)?;
        self.owned_hotel(owner, id).await?;

        let deleted = self.delete_hotel_rows(id).await;
        self.invalidate_property(owner, id).await;
        let rooms = deleted?;

        tracing::debug!(hotel_id = id, owner = %owner, rooms, "Property deleted");
        Ok(SaveOutcome { success: true, id })
    }

    /// Deletes the rooms of hotel `id`, then the hotel. Returns the room count.
    async fn delete_hotel_rows(&self, id: i64) -> Result<u64> {
        let rooms = self
            .store
            .delete(Entity::Rooms, &[Filter::Eq("hotel_id".into(), Value::from(id))])
            .await?;
        self.store.delete(Entity::Hotels, &[id_filter(id)]).await?;
        Ok(rooms)
    }

    /// Changes the status of a booking on one of the caller's properties.
    pub async fn update_booking_status(
        &self,
        scope: Option<&CallerScope>,
        id: i64,
        update: BookingStatusUpdate,
    ) -> Result<SaveOutcome> {
        let owner = scope.ok_or(AdminError::Unauthorized)?;
        let status = update.status.trim();
        if status.is_empty() {
            return Err(AdminError::InvalidInput("status is required".to_string()));
        }

        let booking: BookingRecord = self
            .first(
                Query::table(Entity::Bookings)
                    .select(BookingRecord::COLUMNS)
                    .eq("id", id),
            )
            .await?
            .ok_or(RepositoryError::NotFound {
                entity_type: "booking",
                id: id.to_string(),
            })?;
        let room: Option<RoomRecord> = self
            .first(
                Query::table(Entity::Rooms)
                    .select(RoomRecord::COLUMNS)
                    .eq("id", booking.room_id),
            )
            .await?;
        let Some(room) = room else {
            return Err(AdminError::Forbidden);
        };
        self.owned_hotel(owner, room.hotel_id).await?;

        self.store
            .update(Entity::Bookings, &[id_filter(id)], row(json!({ "status": status })))
            .await?;

        self.cache
            .invalidate(&[
                scope_pattern(CacheNamespace::Bookings, owner),
                scope_pattern(CacheNamespace::Stats, owner),
            ])
            .await;

        tracing::debug!(booking_id = id, owner = %owner, status, "Booking status updated");
        Ok(SaveOutcome { success: true, id })
    }

    /// Drops every cached view that embeds hotel `id`.
    async fn invalidate_property(&self, owner: &CallerScope, id: i64) {
        if let Ok(key) = derive_key(CacheNamespace::Property, Some(owner), &property_params(id)) {
            self.cache.invalidate_key(&key).await;
        }
        self.cache
            .invalidate(&[
                scope_pattern(CacheNamespace::Properties, owner),
                scope_pattern(CacheNamespace::Stats, owner),
                scope_pattern(CacheNamespace::Bookings, owner),
            ])
            .await;
    }

    // ------------------------------------------------------------------
    // Loaders
    // ------------------------------------------------------------------

    async fn first<T: serde::de::DeserializeOwned>(&self, query: Query) -> Result<Option<T>> {
        let rows = self.store.select(&query).await?;
        Ok(decode_rows(rows)?.into_iter().next())
    }

    async fn owned_hotels(&self, owner: &CallerScope) -> Result<Vec<HotelRecord>> {
        let rows = self
            .store
            .select(
                &Query::table(Entity::Hotels)
                    .select(HotelRecord::COLUMNS)
                    .eq("owner_id", owner.as_str()),
            )
            .await?;
        Ok(decode_rows(rows)?)
    }

    async fn owned_hotel(&self, owner: &CallerScope, id: i64) -> Result<HotelRecord> {
        let hotel: Option<HotelRecord> = self
            .first(
                Query::table(Entity::Hotels)
                    .select(HotelRecord::COLUMNS)
                    .eq("id", id),
            )
            .await?;

        match hotel {
            Some(hotel) if owned_by(&hotel, owner) => Ok(hotel),
            _ => {
                tracing::debug!(hotel_id = id, owner = %owner, "Property access denied");
                Err(AdminError::Forbidden)
            }
        }
    }

    async fn rooms_of(&self, hotels: &[HotelRecord]) -> Result<Vec<RoomRecord>> {
        if hotels.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self
            .store
            .select(
                &Query::table(Entity::Rooms)
                    .select(RoomRecord::COLUMNS)
                    .is_in("hotel_id", hotels.iter().map(|h| h.id)),
            )
            .await?;
        Ok(decode_rows(rows)?)
    }

    async fn bookings_of(&self, rooms: &[RoomRecord]) -> Result<Vec<BookingRecord>> {
        if rooms.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self
            .store
            .select(
                &Query::table(Entity::Bookings)
                    .select(BookingRecord::COLUMNS)
                    .is_in("room_id", rooms.iter().map(|r| r.id)),
            )
            .await?;
        Ok(decode_rows(rows)?)
    }
}

fn id_filter(id: i64) -> Filter {
    Filter::Eq("id".to_string(), Value::from(id))
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}
