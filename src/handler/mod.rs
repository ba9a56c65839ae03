//! Request handlers assembled by widgets.
//!
//! # Data Flow
//! ```text
//! RequestContext
//!     → template.rs (default adders → data bag → function → render | redirect)
//!     → redirect.rs (function → target → redirect)
//! ```

pub mod data;
pub mod pagination;
pub mod redirect;
pub mod template;

pub use data::{DataAdder, DataBag};
pub use pagination::{requested_id, Pagination};
pub use redirect::RedirectHandler;
pub use template::{Outcome, TemplateHandler};
