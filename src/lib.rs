//! Site engine library.
//!
//! Serves one or more sites, each a tree of named pages. Every page contributes
//! request handlers under its path; static pages render localized templates and
//! may be discovered from the templates folder.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ session middleware ──▶ page tree routes
//!                                                               │
//!                                        ┌──────────────────────┤
//!                                        ▼                      ▼
//!                              handler::template        handler::redirect
//!                       (adders → data → render|redirect)   (target → 302)
//!                                        │
//!                                        ▼
//!                              services (auth, locales, errors, templates)
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod page;
pub mod routing;
pub mod services;
pub mod site;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ServerConfig;
pub use error::{ServiceError, StartupError};
pub use http::{RequestContext, SiteServer};
pub use lifecycle::{run_sites, Shutdown};
pub use page::{Page, StaticWidget, Widget};
pub use site::{build_default_site, Site};
