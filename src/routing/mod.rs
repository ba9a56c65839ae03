//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Page tree (at startup):
//!     root widget → load_into(Scope::root)
//!     → each static widget registers "GET /" in its scope
//!     → recurses into children with scope.group(child name)
//!     → flat axum Router, frozen before serving
//!
//! Incoming Request:
//!     path matched by axum → handler of the terminal page
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - One route per page: a request reaches exactly one leaf handler

pub mod scope;

pub use scope::Scope;
