//! Page tree routing through a fully built site router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{header, StatusCode};

use site_engine::config::{ServerConfig, SiteConfig};
use site_engine::handler::{Outcome, RedirectHandler, TemplateHandler};
use site_engine::routing::Scope;
use site_engine::services::{Action, GrantAuthService, Session, PUBLIC_GROUP_ID};
use site_engine::{build_default_site, Page, Widget};

mod common;
use common::{body_string, fixture_site, into_router, location, send, site_config, CountingRenderer};

const TEMPLATES: &[(&str, &str)] = &[
    ("index.html", "home"),
    ("a.html", "a"),
    ("b.html", "b"),
    ("leaf", "leaf {{ Lang }}"),
    ("about.html", "about"),
    ("fr/about.html", "a propos"),
    ("members.html", "members"),
    ("settings/edit", "edit {{ CurrentUrl }}"),
];

/// Leaf widget counting its invocations.
struct CountingWidget {
    calls: Arc<AtomicUsize>,
}

impl Widget for CountingWidget {
    fn load_into(&self, scope: &mut Scope<'_>) {
        let calls = self.calls.clone();
        let handler = TemplateHandler::new("test/leaf", move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Outcome::render("leaf") })
        });
        scope.route("/", handler.get());
    }
}

/// Edit form plus a save endpoint redirecting back to the form.
struct SettingsWidget;

impl Widget for SettingsWidget {
    fn load_into(&self, scope: &mut Scope<'_>) {
        let edit = TemplateHandler::new("settings/edit", |_, _| {
            Box::pin(async { Outcome::render("settings/edit") })
        });
        let save = RedirectHandler::new(|ctx| Box::pin(async move { format!("{}edit", ctx.base_url(1)) }));
        scope.route("/", edit.get()).route("/edit", edit.get()).route("/save", save.post());
    }
}

#[tokio::test]
async fn test_request_reaches_leaf_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let renderer = CountingRenderer::new(TEMPLATES);

    let mut b = Page::new_static("b", PUBLIC_GROUP_ID, "b.html");
    b.add_sub_page(Page::new("c", CountingWidget { calls: calls.clone() }));
    let mut a = Page::new_static("a", PUBLIC_GROUP_ID, "a.html");
    a.add_sub_page(b);

    let mut site = fixture_site(site_config(), GrantAuthService::new());
    site.add_page(a);
    site.set_renderer(renderer.clone());
    let router = into_router(site);

    let response = send(&router, "GET", "/a/b/c", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "leaf en");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(renderer.count("leaf"), 1);
    assert_eq!(renderer.total(), 1);

    let response = send(&router, "GET", "/a/b/c/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let response = send(&router, "GET", "/a/b", None).await;
    assert_eq!(body_string(response).await, "b");
}

#[tokio::test]
async fn test_custom_widget_ignores_sub_pages() {
    let mut settings = Page::new("settings", SettingsWidget);
    settings.add_sub_page(Page::new_static("child", PUBLIC_GROUP_ID, "about.html"));
    assert!(settings.sub_pages().is_empty());

    let mut site = fixture_site(site_config(), GrantAuthService::new());
    site.add_page(settings);
    site.set_renderer(CountingRenderer::new(TEMPLATES));
    let router = into_router(site);

    let response = send(&router, "GET", "/settings/child", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/not-found");
}

#[tokio::test]
async fn test_widget_routes_share_base_url() {
    let mut site = fixture_site(site_config(), GrantAuthService::new());
    site.add_page(Page::new("settings", SettingsWidget));
    site.set_renderer(CountingRenderer::new(TEMPLATES));
    let router = into_router(site);

    let response = send(&router, "GET", "/settings/edit", None).await;
    assert_eq!(body_string(response).await, "edit /settings/edit/");

    let response = send(&router, "POST", "/settings/save", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/settings/edit");
}

#[tokio::test]
async fn test_static_page_follows_lang_cookie() {
    let mut site = fixture_site(site_config(), GrantAuthService::new());
    site.add_page(Page::new_static("about", PUBLIC_GROUP_ID, "about.html"));
    site.set_renderer(CountingRenderer::new(TEMPLATES));
    let router = into_router(site);

    let response = send(&router, "GET", "/about", None).await;
    assert_eq!(body_string(response).await, "about");

    let response = send(&router, "GET", "/about", Some("lang=fr")).await;
    assert_eq!(body_string(response).await, "a propos");

    let response = send(&router, "GET", "/", None).await;
    assert_eq!(body_string(response).await, "home");
}

#[tokio::test]
async fn test_restricted_page_redirects_to_error_page() {
    let auth = GrantAuthService::new();
    auth.grant(5, 9, Action::Access);

    let mut site = fixture_site(site_config(), auth);
    site.add_page(Page::hidden_static("members", 9, "members.html"));
    site.set_renderer(CountingRenderer::new(TEMPLATES));
    let router = into_router(site);

    let response = send(&router, "GET", "/members", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/error?error=ErrorNotAuthorized");
}

#[tokio::test]
async fn test_unknown_route_redirects_to_404_page() {
    let mut site = fixture_site(site_config(), GrantAuthService::new());
    site.set_renderer(CountingRenderer::new(TEMPLATES));
    let router = into_router(site);

    let response = send(&router, "GET", "/nope/deeper", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/not-found");
}

#[tokio::test]
async fn test_change_lang_endpoint() {
    let mut site = fixture_site(site_config(), GrantAuthService::new());
    site.set_renderer(CountingRenderer::new(TEMPLATES));
    let router = into_router(site);

    let response = send(&router, "GET", "/changeLang?lang=fr&Redirect=/about", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/about");
    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("lang=fr;")));
    assert!(cookies.iter().any(|c| c.starts_with("site_session_id=")));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let mut site = fixture_site(site_config(), GrantAuthService::new());
    site.set_renderer(CountingRenderer::new(TEMPLATES));
    let router = into_router(site);

    let response = send(&router, "GET", "/", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[test]
fn test_session_default_is_anonymous() {
    assert_eq!(Session::default().user_id(), 0);
}

#[tokio::test]
async fn test_discovered_directory_renders_its_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("a")).unwrap();
    std::fs::write(dir.path().join("index.html"), "HOME").unwrap();
    std::fs::write(dir.path().join("a/index.html"), "A-INDEX").unwrap();
    std::fs::write(dir.path().join("a/b.html"), "A-B").unwrap();

    let site_config = SiteConfig {
        templates_path: dir.path().to_string_lossy().into_owned(),
        static_pages_folder: Some(String::new()),
        ..site_config()
    };
    let site = build_default_site(&ServerConfig::default(), &site_config).unwrap();
    assert!(site.page("index").is_none());
    let names: Vec<_> = site.root().sub_pages().iter().map(Page::name).collect();
    assert_eq!(names, vec!["a"]);
    let router = into_router(site);

    let response = send(&router, "GET", "/a", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "A-INDEX");

    let response = send(&router, "GET", "/a/", None).await;
    assert_eq!(body_string(response).await, "A-INDEX");

    let response = send(&router, "GET", "/a/b", None).await;
    assert_eq!(body_string(response).await, "A-B");

    let response = send(&router, "GET", "/", None).await;
    assert_eq!(body_string(response).await, "HOME");

    let response = send(&router, "GET", "/index", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/not-found");
}
