//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tower::ServiceExt;

use site_engine::config::{LocalesConfig, SiteConfig, TimeoutConfig};
use site_engine::handler::DataBag;
use site_engine::services::{GrantAuthService, Locales, MemorySessionStore};
use site_engine::templates::{RenderError, TemplateRenderer, TemplateStore};
use site_engine::Site;

/// Renderer recording every template it was asked for.
#[derive(Default, Clone)]
pub struct CountingRenderer {
    store: TemplateStore,
    rendered: Arc<Mutex<HashMap<String, usize>>>,
}

impl CountingRenderer {
    pub fn new(templates: &[(&str, &str)]) -> Self {
        let mut store = TemplateStore::new();
        for (name, content) in templates {
            store.insert(*name, *content);
        }
        Self {
            store,
            rendered: Arc::default(),
        }
    }

    pub fn count(&self, name: &str) -> usize {
        self.rendered.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.rendered.lock().unwrap().values().sum()
    }
}

impl TemplateRenderer for CountingRenderer {
    fn render(&self, name: &str, data: &DataBag) -> Result<String, RenderError> {
        *self.rendered.lock().unwrap().entry(name.to_string()).or_default() += 1;
        self.store.render(name, data)
    }
}

pub fn site_config() -> SiteConfig {
    SiteConfig {
        name: "test".into(),
        port: "0".into(),
        page_404_url: "/not-found".into(),
        error_page_url: "/error".into(),
        ..SiteConfig::default()
    }
}

/// Site serving `en` (default) and `fr`, with an empty grant table.
pub fn fixture_site(config: SiteConfig, auth: GrantAuthService) -> Site {
    Site::new(
        config,
        Arc::new(Locales::new(&LocalesConfig {
            default_lang: "en".into(),
            all_langs: vec!["en".into(), "fr".into()],
        })),
        Arc::new(auth),
        Arc::new(MemorySessionStore::default()),
    )
}

pub fn into_router(site: Site) -> Router {
    site.into_router(&TimeoutConfig::default()).unwrap()
}

pub async fn send(router: &Router, method: &str, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}
