//! Site assembly.
//!
//! # Data Flow
//! ```text
//! SiteConfig + collaborators
//!     → Site::new (root page, default data)
//!     → add_page / add_static_pages_from_folder / add_default_data / set_renderer
//!     → into_router (frozen services, page tree loaded, fixed routes, layers)
//!     → SiteServer
//! ```
//!
//! # Design Decisions
//! - A site without renderer never starts
//! - Fixed routes (`/static`, favicon, language change) are mounted next to the
//!   page tree, so top-level pages must not reuse their names
//! - Static files and the 404 redirect bypass the session middleware

pub mod adders;
pub mod lang;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, SiteConfig, TimeoutConfig};
use crate::error::StartupError;
use crate::handler::data::DataAdder;
use crate::http::middleware::session_middleware;
use crate::http::response::{check_target, found};
use crate::http::server::{AppState, SiteServer};
use crate::page::Page;
use crate::routing::Scope;
use crate::services::{
    AuthService, ErrorRedirects, GrantAuthService, LocaleManager, Locales, MemorySessionStore,
    Services, SessionStore, PUBLIC_GROUP_ID,
};
use crate::templates::{TemplateRenderer, TemplateStore};

pub use adders::NavEntry;

pub const FAVICON_PATH: &str = "/favicon.ico";

/// Top-level page names taken by the fixed routes.
pub const RESERVED_PAGE_NAMES: &[&str] = &["static", "favicon.ico", "changeLang", "langPicture"];

/// Page tree and collaborators of one site, mutable until turned into a router.
pub struct Site {
    config: SiteConfig,
    root: Page,
    locales: Arc<dyn LocaleManager>,
    auth: Arc<dyn AuthService>,
    sessions: Arc<dyn SessionStore>,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    adders: Vec<DataAdder>,
}

impl Site {
    /// Site whose root page renders `index<ext>` to everyone.
    pub fn new(
        config: SiteConfig,
        locales: Arc<dyn LocaleManager>,
        auth: Arc<dyn AuthService>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let root = Page::new_static(
            "root",
            PUBLIC_GROUP_ID,
            format!("index{}", config.templates_ext),
        );
        Self {
            config,
            root,
            locales,
            auth,
            sessions,
            renderer: None,
            adders: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn root(&self) -> &Page {
        &self.root
    }

    /// Attach a top-level page.
    pub fn add_page(&mut self, page: Page) {
        self.root.add_sub_page(page);
    }

    /// Top-level page named `name`.
    pub fn page(&self, name: &str) -> Option<&Page> {
        self.root.sub_page(name)
    }

    pub fn page_mut(&mut self, name: &str) -> Option<&mut Page> {
        self.root.sub_page_mut(name)
    }

    /// Register an adder run before every templated handler, after the built-in
    /// ones and those registered earlier.
    pub fn add_default_data(&mut self, adder: DataAdder) {
        self.adders.push(adder);
    }

    /// Mirror `<templates_path>/<folder>` as static pages under the root.
    pub fn add_static_pages_from_folder(&mut self, group_id: u64, folder: &str) -> Result<(), StartupError> {
        self.root.add_static_pages_from_folder(
            group_id,
            folder,
            Path::new(&self.config.templates_path),
            &self.config.templates_ext,
        )
    }

    pub fn set_renderer(&mut self, renderer: impl TemplateRenderer + 'static) {
        self.renderer = Some(Arc::new(renderer));
    }

    /// Freeze the site into a ready-to-serve router.
    #[allow(deprecated)]
    pub fn into_router(self, timeouts: &TimeoutConfig) -> Result<Router, StartupError> {
        let Site {
            config,
            root,
            locales,
            auth,
            sessions,
            renderer,
            adders,
        } = self;

        let renderer = renderer.ok_or_else(|| StartupError::MissingRenderer(config.name.clone()))?;

        let mut all_adders = adders::builtin_adders(adders::navigation(&root));
        all_adders.extend(adders);

        let services = Arc::new(Services {
            locales: locales.clone(),
            auth,
            renderer,
            sessions,
            session_config: config.session.clone(),
            errors: ErrorRedirects::new(config.error_page_url.clone()),
            adders: all_adders,
        });
        let state = AppState::new(services);

        if let Some(page) = root
            .sub_pages()
            .iter()
            .find(|page| RESERVED_PAGE_NAMES.contains(&page.name()))
        {
            return Err(StartupError::ReservedPageName(page.name().to_string()));
        }

        // Only the page tree and the language switch see the session middleware.
        let mut pages = Router::new();
        root.load_into(&mut Scope::root(&mut pages));
        if locales.multiple_langs() {
            pages = pages.route(lang::CHANGE_LANG_PATH, get(lang::change_lang));
        }
        let pages = pages.layer(from_fn_with_state(state.clone(), session_middleware));

        let mut assets = Router::new().nest_service("/static", ServeDir::new(&config.static_path));
        if let Some(favicon) = &config.favicon_path {
            assets = assets.route_service(FAVICON_PATH, ServeFile::new(favicon));
        }
        if locales.multiple_langs() {
            for lang in locales.all_langs() {
                if let Some(picture) = config.lang_picture_paths.get(lang) {
                    let path = format!("{}{lang}", lang::LANG_PICTURE_PREFIX);
                    assets = assets.route_service(&path, ServeFile::new(picture));
                }
            }
        }

        let not_found = check_target(&config.page_404_url).to_string();
        let assets = assets.fallback(move || {
            let not_found = not_found.clone();
            async move { found(&not_found) }
        });

        tracing::info!(
            site = %config.name,
            pages = root.sub_pages().len(),
            multiple_langs = locales.multiple_langs(),
            session_ttl_secs = config.session.timeout_secs,
            "Site router built"
        );

        Ok(pages
            .merge(assets)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid)))
    }

    /// Freeze the site and pair it with its listening port.
    pub fn into_server(self, timeouts: &TimeoutConfig) -> Result<SiteServer, StartupError> {
        let name = self.config.name.clone();
        let port = self.config.port.clone();
        Ok(SiteServer::new(name, &port, self.into_router(timeouts)?))
    }
}

/// Site wired with the config-backed collaborators, its templates loaded and its
/// static pages discovered.
pub fn build_default_site(config: &ServerConfig, site_config: &SiteConfig) -> Result<Site, StartupError> {
    let mut site = Site::new(
        site_config.clone(),
        Arc::new(Locales::new(&config.locales)),
        Arc::new(GrantAuthService::from_config(&config.auth)),
        Arc::new(MemorySessionStore::new(Duration::from_secs(site_config.session.timeout_secs))),
    );

    let templates = TemplateStore::load(Path::new(&site_config.templates_path), &site_config.templates_ext)?;
    site.set_renderer(templates);

    if let Some(folder) = &site_config.static_pages_folder {
        site.add_static_pages_from_folder(site_config.static_pages_group_id, folder)?;
    }
    Ok(site)
}
