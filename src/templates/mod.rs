//! Template rendering.
//!
//! The page tree only needs "render this template name with this data bag"; the
//! default `TemplateStore` loads files from disk at startup and fills `{{ Key }}`
//! placeholders.

pub mod store;

use thiserror::Error;

use crate::handler::data::DataBag;

pub use store::TemplateStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unknown template {0:?}")]
    UnknownTemplate(String),
}

/// Produces a response body from a template name and a data bag.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, data: &DataBag) -> Result<String, RenderError>;
}
