//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Cache backend state (passive, no backend call)

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::cache::CacheHealth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub backend: &'static str,
    pub state: CacheHealth,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub cache: CacheStatus,
}

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Reports the cache state seen by the last backend call.
///
/// A degraded cache still answers 200: requests are served from the data
/// store while it is down.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        cache: CacheStatus {
            backend: state.cache.backend_name(),
            state: state.cache.health(),
        },
    })
}
