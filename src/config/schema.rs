//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration: shared collaborators plus one entry per served site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Supported languages.
    pub locales: LocalesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rights granted to users on permission groups.
    pub auth: AuthConfig,

    /// Sites served by this process, each on its own port.
    pub sites: Vec<SiteConfig>,
}

/// Per-site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site identifier for logging.
    pub name: String,

    /// Listening port ("8080" or ":8080").
    pub port: String,

    /// Root folder of the templates.
    pub templates_path: String,

    /// Extension of template files, dot included.
    pub templates_ext: String,

    /// Folder served under `/static`.
    pub static_path: String,

    /// File served as `/favicon.ico`.
    pub favicon_path: Option<String>,

    /// Redirect target for unknown routes.
    pub page_404_url: String,

    /// Page receiving the `error` query parameter on failures.
    pub error_page_url: String,

    /// Templates sub-folder turned into static pages at startup.
    pub static_pages_folder: Option<String>,

    /// Permission group of the discovered static pages.
    pub static_pages_group_id: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Picture shown for each language in the language selector.
    pub lang_picture_paths: HashMap<String, String>,

    /// Session cookie settings.
    pub session: SessionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "site".to_string(),
            port: "8080".to_string(),
            templates_path: "templates".to_string(),
            templates_ext: ".html".to_string(),
            static_path: "static".to_string(),
            favicon_path: None,
            page_404_url: "/".to_string(),
            error_page_url: "/".to_string(),
            static_pages_folder: None,
            static_pages_group_id: 0,
            max_body_size: 2 * 1024 * 1024, // 2MB
            lang_picture_paths: HashMap::new(),
            session: SessionConfig::default(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    pub cookie_name: String,

    /// Cookie lifetime in seconds.
    pub timeout_secs: u64,

    /// Cookie domain, omitted when empty.
    pub domain: String,

    /// Restrict the cookie to HTTPS.
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "site_session_id".to_string(),
            timeout_secs: 1200,
            domain: String::new(),
            secure: false,
        }
    }
}

/// Language configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalesConfig {
    /// Language used when the requester expresses no supported preference.
    pub default_lang: String,

    /// Every supported language, default included.
    pub all_langs: Vec<String>,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            default_lang: "en".to_string(),
            all_langs: vec!["en".to_string()],
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Authorization grants.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub grants: Vec<GrantConfig>,
}

/// Actions a user may perform on a permission group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrantConfig {
    pub user_id: u64,
    pub group_id: u64,
    /// Lowercase action names: access, create, update, delete.
    pub actions: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
