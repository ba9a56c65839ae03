//! Site page tree.
//!
//! # Structure
//! ```text
//! Page (name, visible)
//!  └─ Widget            registers handlers under the page path
//!      └─ StaticWidget  renders a localized template, owns sub-pages
//! ```
//!
//! The tree is assembled once at startup (by hand or through folder discovery),
//! loaded into the router, then only read.

pub mod discovery;
pub mod static_widget;
pub mod widget;

pub use static_widget::{localized_template, localized_template_name, StaticWidget};
pub use widget::{Page, Widget};
