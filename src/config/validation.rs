//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, extensions)
//! - Check referential integrity (languages referenced by sites exist)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoSite,
    InvalidPort { site: String, port: String },
    DuplicatePort { port: String },
    TemplatesExt { site: String, ext: String },
    DefaultLangNotListed { lang: String },
    UnknownPictureLang { site: String, lang: String },
    ZeroSessionTimeout { site: String },
    ZeroTimeout,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoSite => write!(f, "no site configured"),
            ValidationError::InvalidPort { site, port } => {
                write!(f, "site {site}: invalid port {port:?}")
            }
            ValidationError::DuplicatePort { port } => write!(f, "port {port} used twice"),
            ValidationError::TemplatesExt { site, ext } => {
                write!(f, "site {site}: templates_ext {ext:?} must start with '.'")
            }
            ValidationError::DefaultLangNotListed { lang } => {
                write!(f, "default_lang {lang:?} missing from all_langs")
            }
            ValidationError::UnknownPictureLang { site, lang } => {
                write!(f, "site {site}: picture for unknown lang {lang:?}")
            }
            ValidationError::ZeroSessionTimeout { site } => {
                write!(f, "site {site}: session.timeout_secs must be > 0")
            }
            ValidationError::ZeroTimeout => write!(f, "timeouts.request_secs must be > 0"),
        }
    }
}

/// Normalize a port to the `:port` form.
pub fn check_port(port: &str) -> String {
    if port.starts_with(':') {
        port.to_string()
    } else {
        format!(":{port}")
    }
}

/// Validate the semantic consistency of a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.sites.is_empty() {
        errors.push(ValidationError::NoSite);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let locales = &config.locales;
    if !locales.all_langs.contains(&locales.default_lang) {
        errors.push(ValidationError::DefaultLangNotListed {
            lang: locales.default_lang.clone(),
        });
    }

    let mut ports = HashSet::new();
    for site in &config.sites {
        let port = check_port(&site.port);
        if port[1..].parse::<u16>().is_err() {
            errors.push(ValidationError::InvalidPort {
                site: site.name.clone(),
                port: site.port.clone(),
            });
        } else if !ports.insert(port.clone()) {
            errors.push(ValidationError::DuplicatePort { port });
        }

        if !site.templates_ext.starts_with('.') {
            errors.push(ValidationError::TemplatesExt {
                site: site.name.clone(),
                ext: site.templates_ext.clone(),
            });
        }

        if site.session.timeout_secs == 0 {
            errors.push(ValidationError::ZeroSessionTimeout {
                site: site.name.clone(),
            });
        }

        for lang in site.lang_picture_paths.keys() {
            if !locales.all_langs.contains(lang) {
                errors.push(ValidationError::UnknownPictureLang {
                    site: site.name.clone(),
                    lang: lang.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SiteConfig;

    fn site(name: &str, port: &str) -> SiteConfig {
        SiteConfig {
            name: name.to_string(),
            port: port.to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_check_port() {
        assert_eq!(check_port("8080"), ":8080");
        assert_eq!(check_port(":8080"), ":8080");
    }

    #[test]
    fn test_valid_config() {
        let config = ServerConfig {
            sites: vec![site("a", "8080"), site("b", ":8081")],
            ..ServerConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig {
            sites: vec![site("a", "8080"), site("b", ":8080"), site("c", "http")],
            ..ServerConfig::default()
        };
        config.locales.default_lang = "de".to_string();
        config.sites[0].templates_ext = "html".to_string();
        config.sites[0]
            .lang_picture_paths
            .insert("it".to_string(), "it.png".to_string());
        config.sites[1].session.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DefaultLangNotListed { lang: "de".into() },
                ValidationError::TemplatesExt { site: "a".into(), ext: "html".into() },
                ValidationError::UnknownPictureLang { site: "a".into(), lang: "it".into() },
                ValidationError::DuplicatePort { port: ":8080".into() },
                ValidationError::ZeroSessionTimeout { site: "b".into() },
                ValidationError::InvalidPort { site: "c".into(), port: "http".into() },
            ]
        );
    }
}
