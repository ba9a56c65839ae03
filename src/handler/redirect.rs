//! Redirect handler: always answers with a redirect to a computed target.

use std::sync::Arc;

use axum::response::Response;
use axum::routing::{self, MethodRouter};
use futures_util::future::BoxFuture;

use crate::http::request::RequestContext;
use crate::http::response::{check_target, found};
use crate::http::server::AppState;

type RedirectFn = dyn for<'a> Fn(&'a RequestContext) -> BoxFuture<'a, String> + Send + Sync;

/// Request handler built from a `context -> target` function.
#[derive(Clone)]
pub struct RedirectHandler {
    redirecter: Arc<RedirectFn>,
}

impl RedirectHandler {
    pub fn new<F>(redirecter: F) -> Self
    where
        F: for<'a> Fn(&'a RequestContext) -> BoxFuture<'a, String> + Send + Sync + 'static,
    {
        Self {
            redirecter: Arc::new(redirecter),
        }
    }

    /// Handler redirecting every request to `target`.
    pub fn fixed(target: impl Into<String>) -> Self {
        let target = check_target(&target.into()).to_string();
        Self::new(move |_| {
            let target = target.clone();
            Box::pin(async move { target })
        })
    }

    /// Target for this request, the site root when the function returned nothing.
    pub async fn target(&self, ctx: &RequestContext) -> String {
        check_target(&(self.redirecter)(ctx).await).to_string()
    }

    pub async fn handle(&self, ctx: RequestContext) -> Response {
        found(&self.target(&ctx).await)
    }

    pub fn get(&self) -> MethodRouter<AppState> {
        let handler = self.clone();
        routing::get(move |ctx: RequestContext| {
            let handler = handler.clone();
            async move { handler.handle(ctx).await }
        })
    }

    pub fn post(&self) -> MethodRouter<AppState> {
        let handler = self.clone();
        routing::post(move |ctx: RequestContext| {
            let handler = handler.clone();
            async move { handler.handle(ctx).await }
        })
    }
}
