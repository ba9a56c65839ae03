//! Per-request context.
//!
//! # Responsibilities
//! - Expose the frozen site services to handlers
//! - Extract routing-relevant information (path, query, path params)
//! - Carry the resolved language and the session handle
//!
//! # Design Decisions
//! - Everything a handler needs travels in `RequestContext`, no ambient lookup
//! - Contexts can be built directly, so handlers are testable without a server

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::{header, request::Parts, HeaderMap};
use ::url::form_urlencoded;

use crate::http::server::AppState;
use crate::http::url;
use crate::services::{Services, Session};

/// Value of the cookie named `name`, if present.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Everything a handler may consult about the current request.
#[derive(Clone)]
pub struct RequestContext {
    services: Arc<Services>,
    path: String,
    query: HashMap<String, String>,
    params: HashMap<String, String>,
    lang: String,
    session: Session,
}

impl RequestContext {
    /// Context for `path` with no query, no params, an anonymous session and the
    /// default language.
    pub fn new(services: Arc<Services>, path: impl Into<String>) -> Self {
        let lang = services.locales.default_lang().to_string();
        Self {
            services,
            path: path.into(),
            query: HashMap::new(),
            params: HashMap::new(),
            lang,
            session: Session::default(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameter, empty when absent.
    pub fn query(&self, name: &str) -> &str {
        self.query.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Path parameter, empty when absent.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Active language of the requester.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Id of the logged-in user, 0 when anonymous.
    pub fn user_id(&self) -> u64 {
        self.session.user_id()
    }

    pub fn current_url(&self) -> String {
        url::current_url(&self.path)
    }

    pub fn base_url(&self, levels_to_erase: usize) -> String {
        url::base_url(levels_to_erase, &self.path)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let services = state.services.clone();

        let query = parts
            .uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let params = match RawPathParams::from_request_parts(parts, state).await {
            Ok(raw) => raw
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            Err(_) => HashMap::new(),
        };

        let session = match parts.extensions.get::<Session>() {
            Some(session) => session.clone(),
            None => {
                tracing::warn!(path = %parts.uri.path(), "No session attached to request");
                Session::dirty(0)
            }
        };

        let lang = services.locales.lang_from_headers(&parts.headers);

        Ok(Self {
            services,
            path: parts.uri.path().to_string(),
            query,
            params,
            lang,
            session,
        })
    }
}
