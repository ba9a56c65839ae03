//! HTTP plumbing shared by every site.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (bind, serve, graceful shutdown)
//!     → middleware/ (session attached to the request)
//!     → request.rs (RequestContext extracted for the handler)
//!     → handler (page tree)
//!     → response.rs (redirects)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod url;

pub use request::RequestContext;
pub use server::{AppState, SiteServer};
