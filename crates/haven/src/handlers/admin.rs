//! Admin dashboard API handlers.
//!
//! Every route acts for the caller in [`RequestContext`]; anonymous requests
//! get 401 from the service before anything is read or cached.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use haven_core::admin::{
    BookingStatusUpdate, BookingSummary, BookingsQuery, DashboardStats, Property, PropertyInput,
    SaveOutcome,
};

use crate::{context::RequestContext, handlers::AppError, state::AppState};

/// Dashboard counters (GET /api/stats).
pub async fn get_stats(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = state.admin.stats(ctx.caller()).await?;
    Ok(Json(stats))
}

/// The caller's properties with rooms (GET /api/properties).
pub async fn list_properties(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Property>>, AppError> {
    let properties = state.admin.properties(ctx.caller()).await?;
    Ok(Json(properties))
}

/// One of the caller's properties (GET /api/properties/{id}).
pub async fn get_property(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<Property>, AppError> {
    let property = state.admin.property(ctx.caller(), id).await?;
    Ok(Json(property))
}

/// Create or update a property (POST /api/properties).
///
/// Responds 201 when a property was created and 200 when one was updated.
pub async fn save_property(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<PropertyInput>,
) -> Result<impl IntoResponse, AppError> {
    let creating = payload.id.is_none();
    let outcome = state.admin.save_property(ctx.caller(), payload).await?;

    tracing::info!(
        request_id = %ctx.request_id,
        hotel_id = outcome.id,
        created = creating,
        "Saved property"
    );

    let status = if creating {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

/// Delete a property and its rooms (DELETE /api/properties/{id}).
pub async fn delete_property(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<SaveOutcome>, AppError> {
    let outcome = state.admin.delete_property(ctx.caller(), id).await?;
    tracing::info!(request_id = %ctx.request_id, hotel_id = id, "Deleted property");
    Ok(Json(outcome))
}

/// Bookings across the caller's properties (GET /api/bookings?status=).
pub async fn list_bookings(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingSummary>>, AppError> {
    let bookings = state.admin.bookings(ctx.caller(), &query).await?;
    Ok(Json(bookings))
}

/// Change a booking's status (PATCH /api/bookings/{id}).
pub async fn update_booking(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<BookingStatusUpdate>,
) -> Result<Json<SaveOutcome>, AppError> {
    let outcome = state
        .admin
        .update_booking_status(ctx.caller(), id, payload)
        .await?;
    tracing::info!(request_id = %ctx.request_id, booking_id = id, "Updated booking status");
    Ok(Json(outcome))
}
