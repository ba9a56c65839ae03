//! Locale manager.
//!
//! Resolves the language of a requester: the `lang` cookie first, then the
//! `Accept-Language` header, then the site default. Only configured languages are
//! ever returned.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::LocalesConfig;
use crate::http::request::cookie_value;

/// Name of the cookie and query parameter carrying a language choice.
pub const LANG_NAME: &str = "lang";

const LANG_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Language capabilities consumed by the page tree.
pub trait LocaleManager: Send + Sync {
    /// Language used when nothing better is known.
    fn default_lang(&self) -> &str;

    /// Every supported language.
    fn all_langs(&self) -> &[String];

    /// Active language of a request.
    fn lang_from_headers(&self, headers: &HeaderMap) -> String;

    /// Return `candidate` when supported, the default language otherwise.
    fn check_lang(&self, candidate: &str) -> String {
        if self.all_langs().iter().any(|lang| lang == candidate) {
            candidate.to_string()
        } else {
            self.default_lang().to_string()
        }
    }

    fn multiple_langs(&self) -> bool {
        self.all_langs().len() > 1
    }
}

/// Config-backed locale manager.
#[derive(Debug, Clone)]
pub struct Locales {
    default_lang: String,
    all_langs: Vec<String>,
}

impl Locales {
    pub fn new(config: &LocalesConfig) -> Self {
        let mut all_langs = config.all_langs.clone();
        if !all_langs.contains(&config.default_lang) {
            all_langs.insert(0, config.default_lang.clone());
        }
        Self {
            default_lang: config.default_lang.clone(),
            all_langs,
        }
    }

    fn supported(&self, lang: &str) -> Option<&String> {
        self.all_langs.iter().find(|known| known.as_str() == lang)
    }

    fn from_accept_language(&self, value: &str) -> Option<String> {
        // q-values are ignored, tags are tried in listed order.
        value
            .split(',')
            .filter_map(|part| part.split(';').next())
            .map(str::trim)
            .find_map(|tag| {
                self.supported(tag)
                    .or_else(|| tag.split('-').next().and_then(|primary| self.supported(primary)))
            })
            .cloned()
    }
}

impl LocaleManager for Locales {
    fn default_lang(&self) -> &str {
        &self.default_lang
    }

    fn all_langs(&self) -> &[String] {
        &self.all_langs
    }

    fn lang_from_headers(&self, headers: &HeaderMap) -> String {
        if let Some(lang) = cookie_value(headers, LANG_NAME).and_then(|c| self.supported(c)) {
            return lang.clone();
        }
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| self.from_accept_language(v))
            .unwrap_or_else(|| self.default_lang.clone())
    }
}

/// `Set-Cookie` value remembering a language choice.
pub fn lang_cookie(lang: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{LANG_NAME}={lang}; Path=/; Max-Age={LANG_COOKIE_MAX_AGE_SECS}; SameSite=Lax"
    ))
    .ok()
}
