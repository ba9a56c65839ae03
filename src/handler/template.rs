//! Template dispatch handler.
//!
//! Wraps a data-producing function into a request handler that either renders a
//! template with the assembled data bag or redirects. Exactly one of the two
//! happens per invocation.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{self, MethodRouter};
use futures_util::future::BoxFuture;
use tracing::Instrument;

use crate::handler::data::DataBag;
use crate::http::request::RequestContext;
use crate::http::response::found;
use crate::http::server::AppState;
use crate::observability::metrics::{self, DispatchOutcome};
use crate::services::Services;

/// What a template function decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Render the named template with the data bag.
    Render(String),
    /// Redirect to the target, render nothing.
    Redirect(String),
}

impl Outcome {
    pub fn render(template: impl Into<String>) -> Self {
        Outcome::Render(template.into())
    }

    pub fn redirect(target: impl Into<String>) -> Self {
        Outcome::Redirect(target.into())
    }

    /// A non-empty redirect target wins over the template name.
    pub fn from_parts(template: impl Into<String>, redirect: impl Into<String>) -> Self {
        let redirect = redirect.into();
        if redirect.is_empty() {
            Outcome::Render(template.into())
        } else {
            Outcome::Redirect(redirect)
        }
    }
}

type TemplateFn =
    dyn for<'a> Fn(&'a mut DataBag, &'a RequestContext) -> BoxFuture<'a, Outcome> + Send + Sync;

/// Request handler built from a `(data, context) -> Outcome` function.
#[derive(Clone)]
pub struct TemplateHandler {
    name: &'static str,
    redirecter: Arc<TemplateFn>,
}

impl TemplateHandler {
    /// `name` labels the tracing span and the dispatch metrics.
    pub fn new<F>(name: &'static str, redirecter: F) -> Self
    where
        F: for<'a> Fn(&'a mut DataBag, &'a RequestContext) -> BoxFuture<'a, Outcome>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            redirecter: Arc::new(redirecter),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the default adders then the wrapped function.
    pub async fn dispatch(&self, ctx: &RequestContext) -> (DataBag, Outcome) {
        let mut data = init_data(ctx);
        let outcome = (self.redirecter)(&mut data, ctx).await;
        (data, outcome)
    }

    pub async fn handle(&self, ctx: RequestContext) -> Response {
        let span = tracing::info_span!(
            "template_handler",
            handler = self.name,
            path = %ctx.path(),
            user_id = ctx.user_id(),
        );
        async {
            let (data, outcome) = self.dispatch(&ctx).await;
            respond(self.name, ctx.services(), outcome, &data)
        }
        .instrument(span)
        .await
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

/// Fresh data bag filled by every default adder, in registration order.
pub fn init_data(ctx: &RequestContext) -> DataBag {
    let mut data = DataBag::new();
    for adder in &ctx.services().adders {
        adder(&mut data, ctx);
    }
    data
}

fn respond(name: &'static str, services: &Services, outcome: Outcome, data: &DataBag) -> Response {
    match outcome {
        Outcome::Redirect(target) => {
            tracing::debug!(target = %target, "Redirecting");
            metrics::record_dispatch(name, DispatchOutcome::Redirect);
            found(&target)
        }
        Outcome::Render(template) => match services.renderer.render(&template, data) {
            Ok(body) => {
                metrics::record_dispatch(name, DispatchOutcome::Render);
                Html(body).into_response()
            }
            Err(e) => {
                tracing::error!(template = %template, error = %e, "Failed to render template");
                metrics::record_dispatch(name, DispatchOutcome::Error);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}
