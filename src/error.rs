//! Error types shared across the site engine.
//!
//! # Error Classes
//! - `ServiceError`: request-time failures of external collaborators. Templated
//!   endpoints turn them into redirects; raw endpoints (feeds) into status codes.
//! - `StartupError`: misconfiguration detected while building a site. Always fatal,
//!   the server never accepts traffic in a partially-initialized state.

use std::path::PathBuf;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::loader::ConfigError;

/// Lookup key for authorization denials.
pub const NOT_AUTHORIZED_KEY: &str = "ErrorNotAuthorized";

/// Lookup key for failures whose details must not reach the end user.
pub const TECHNICAL_KEY: &str = "ErrorTechnicalProblem";

/// Lookup key used when a request needs a logged-in user.
pub const UNKNOWN_USER_KEY: &str = "ErrorUnknownUser";

/// Failure of a collaborator while serving a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The requester lacks the right for the action.
    #[error("{}", NOT_AUTHORIZED_KEY)]
    NotAuthorized,

    /// Generic failure, hidden from the end user.
    #[error("{}", TECHNICAL_KEY)]
    Technical,

    /// A backend reported an error identified by `key`.
    #[error("{key}")]
    Backend { key: String },
}

impl ServiceError {
    /// Backend failure identified by `key`.
    pub fn backend(key: impl Into<String>) -> Self {
        Self::Backend { key: key.into() }
    }

    /// String identifier fed to the error-redirect resolver.
    pub fn key(&self) -> &str {
        match self {
            ServiceError::NotAuthorized => NOT_AUTHORIZED_KEY,
            ServiceError::Technical => TECHNICAL_KEY,
            ServiceError::Backend { key } => key,
        }
    }

    /// Status code for endpoints that answer without a template.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotAuthorized => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Fatal error raised while assembling or starting a site.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("wrong templates path {path:?}: {source}")]
    TemplatesPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load static pages: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no template renderer initialized for site {0}")]
    MissingRenderer(String),

    #[error("top-level page name {0:?} is taken by a fixed route")]
    ReservedPageName(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metrics exporter: {0}")]
    Metrics(String),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
