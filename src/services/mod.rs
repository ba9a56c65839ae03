//! Collaborators consumed by the page tree.
//!
//! # Capabilities
//! ```text
//! auth.rs     AuthService      auth_query(user, group, action)
//! locale.rs   LocaleManager    default/checked/active language
//! errors.rs   ErrorRedirects   error key → user-facing redirect
//! session.rs  SessionStore     session ids and data
//! ```
//!
//! The `Services` aggregate is built once per site, frozen, and shared with every
//! request through the router state.

pub mod auth;
pub mod errors;
pub mod locale;
pub mod session;

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::handler::data::DataAdder;
use crate::templates::TemplateRenderer;

pub use auth::{Action, AuthService, GrantAuthService, PUBLIC_GROUP_ID};
pub use errors::ErrorRedirects;
pub use locale::{LocaleManager, Locales};
pub use session::{MemorySessionStore, Session, SessionStore, DEFAULT_SESSION_TTL};

/// Read-only collaborators of a running site.
pub struct Services {
    pub locales: Arc<dyn LocaleManager>,
    pub auth: Arc<dyn AuthService>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub sessions: Arc<dyn SessionStore>,
    pub session_config: SessionConfig,
    pub errors: ErrorRedirects,
    pub adders: Vec<DataAdder>,
}
