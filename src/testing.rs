//! Fixtures shared by unit tests.

use std::sync::Arc;

use crate::config::{LocalesConfig, SessionConfig};
use crate::handler::data::DataAdder;
use crate::http::server::AppState;
use crate::services::{ErrorRedirects, GrantAuthService, Locales, MemorySessionStore, Services};
use crate::templates::TemplateStore;

pub(crate) const TEST_TEMPLATES: &[(&str, &str)] = &[
    ("tmpl", "tmpl:{{Title}}"),
    ("index.html", "home"),
    ("list", "list"),
    ("fr/list", "liste"),
];

/// Services for an `en`/`fr` site backed by in-memory collaborators.
pub(crate) fn services_with(templates: &[(&str, &str)], adders: Vec<DataAdder>) -> Arc<Services> {
    let mut store = TemplateStore::new();
    for (name, content) in templates {
        store.insert(*name, *content);
    }
    Arc::new(Services {
        locales: Arc::new(Locales::new(&LocalesConfig {
            default_lang: "en".into(),
            all_langs: vec!["en".into(), "fr".into()],
        })),
        auth: Arc::new(GrantAuthService::new()),
        renderer: Arc::new(store),
        sessions: Arc::new(MemorySessionStore::default()),
        session_config: SessionConfig::default(),
        errors: ErrorRedirects::default(),
        adders,
    })
}

pub(crate) fn app_state(templates: &[(&str, &str)]) -> AppState {
    AppState::new(services_with(templates, Vec::new()))
}
