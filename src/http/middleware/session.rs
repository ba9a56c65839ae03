//! Session middleware.
//!
//! # Data Flow
//! ```text
//! request cookie → session id → SessionStore::load → Session (request extension)
//!     → handler
//!     → changed? SessionStore::save
//!     → new id? Set-Cookie
//! ```

use std::collections::HashMap;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::config::SessionConfig;
use crate::http::request::cookie_value;
use crate::http::server::AppState;
use crate::services::Session;

/// Attach the requester's session, creating one when the cookie is missing.
pub async fn session_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let services = state.services.clone();
    let config = &services.session_config;

    let existing = cookie_value(req.headers(), &config.cookie_name).and_then(|v| v.parse::<u64>().ok());
    let (session, fresh) = match existing {
        Some(id) => match services.sessions.load(id).await {
            Ok(values) => (Session::new(id, values), false),
            Err(e) => {
                tracing::warn!(session_id = id, error = %e, "Failed to load session");
                (Session::dirty(id), false)
            }
        },
        None => match services.sessions.generate().await {
            Ok(id) => (Session::new(id, HashMap::new()), true),
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate session id");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
    };

    req.extensions_mut().insert(session.clone());
    let mut response = next.run(req).await;

    if session.changed() {
        if let Err(e) = services.sessions.save(session.id(), session.values()).await {
            tracing::warn!(session_id = session.id(), error = %e, "Failed to save session");
        }
    }

    if fresh {
        match session_cookie(config, session.id()) {
            Some(cookie) => {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            None => tracing::warn!(cookie = %config.cookie_name, "Invalid session cookie settings"),
        }
    }
    response
}

/// `Set-Cookie` value carrying the session id.
pub fn session_cookie(config: &SessionConfig, id: u64) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={id}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        config.cookie_name, config.timeout_secs
    );
    if !config.domain.is_empty() {
        cookie.push_str("; Domain=");
        cookie.push_str(&config.domain);
    }
    if config.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}
