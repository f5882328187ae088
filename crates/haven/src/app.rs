use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    context::ADMIN_ID_HEADER,
    handlers::{
        admin::{
            delete_property, get_property, get_stats, list_bookings, list_properties,
            save_property, update_booking,
        },
        health::{healthz, livez},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for the dashboard
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(ADMIN_ID_HEADER)]);

    let api_routes = Router::new()
        .route("/stats", get(get_stats))
        .route("/properties", get(list_properties).post(save_property))
        .route(
            "/properties/{id}",
            get(get_property).delete(delete_property),
        )
        .route("/bookings", get(list_bookings))
        .route("/bookings/{id}", patch(update_booking))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
