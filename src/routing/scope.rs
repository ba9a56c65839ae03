//! Router scope handed to widgets.
//!
//! # Responsibilities
//! - Prefix every route a widget registers with the widget's position in the tree
//! - Hand out nested scopes for child pages
//!
//! # Design Decisions
//! - Routes are registered flat on one router, so handlers see the full request
//!   path (base URL computations rely on it)
//! - A scope's root route answers both with and without trailing slash

use axum::routing::MethodRouter;
use axum::Router;

use crate::http::server::AppState;

/// Routing view rooted at a page's path.
pub struct Scope<'r> {
    prefix: String,
    router: &'r mut Router<AppState>,
}

impl<'r> Scope<'r> {
    /// Scope at the site root.
    pub fn root(router: &'r mut Router<AppState>) -> Self {
        Self {
            prefix: String::new(),
            router,
        }
    }

    /// Path prefix of this scope, empty at the root.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register `method_router` at `path` relative to this scope.
    ///
    /// Registering distinct methods on the same path merges them.
    pub fn route(&mut self, path: &str, method_router: MethodRouter<AppState>) -> &mut Self {
        if path == "/" && !self.prefix.is_empty() {
            let bare = self.prefix.clone();
            let slashed = format!("{}/", self.prefix);
            self.add(&bare, method_router.clone());
            self.add(&slashed, method_router);
        } else {
            let full = format!("{}{}", self.prefix, path);
            self.add(&full, method_router);
        }
        self
    }

    /// Child scope for the page segment `segment`.
    pub fn group(&mut self, segment: &str) -> Scope<'_> {
        Scope {
            prefix: format!("{}/{}", self.prefix, segment.trim_matches('/')),
            router: &mut *self.router,
        }
    }

    fn add(&mut self, path: &str, method_router: MethodRouter<AppState>) {
        tracing::debug!(path, "Registering route");
        let router = std::mem::take(self.router);
        *self.router = router.route(path, method_router);
    }
}
