//! Axum extractor for RequestContext.
//!
//! The caller identity is resolved upstream (the auth gateway in front of the
//! admin backend) and forwarded in the `x-admin-id` header.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use haven_core::cache::CallerScope;
use uuid::Uuid;

use super::types::{RequestContext, RequestId};

/// Header carrying the authenticated admin's id.
pub const ADMIN_ID_HEADER: &str = "x-admin-id";

fn extract_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId::from_uuid)
        .unwrap_or_else(RequestId::new)
}

fn extract_caller(headers: &HeaderMap) -> Option<CallerScope> {
    headers
        .get(ADMIN_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(CallerScope::new)
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext {
            caller: extract_caller(&parts.headers),
            request_id: extract_request_id(&parts.headers),
        })
    }
}
