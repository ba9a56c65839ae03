//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → one SiteConfig handed to each site at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the page tree is built from it once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AuthConfig, GrantConfig, LocalesConfig, ObservabilityConfig, ServerConfig, SessionConfig,
    SiteConfig, TimeoutConfig,
};
pub use validation::{check_port, validate_config, ValidationError};
