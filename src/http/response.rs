//! Redirect responses.
//!
//! # Design Decisions
//! - Redirects use 302 Found: temporary, and turned into a GET after a form POST
//! - An empty target never reaches the `Location` header, it becomes `/`

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::observability::metrics;

/// Target used when a handler produces no destination.
pub const DEFAULT_TARGET: &str = "/";

/// Replace an empty redirect target by the site root.
pub fn check_target(target: &str) -> &str {
    if target.is_empty() {
        DEFAULT_TARGET
    } else {
        target
    }
}

/// 302 response pointing to `target` (the site root when empty or not a valid
/// header value).
pub fn found(target: &str) -> Response {
    let location = HeaderValue::from_str(check_target(target)).unwrap_or_else(|_| {
        tracing::warn!(target = %target, "Invalid redirect target");
        HeaderValue::from_static(DEFAULT_TARGET)
    });
    metrics::record_redirect();
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
