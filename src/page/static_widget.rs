//! Static widget: a template page that can own sub-pages.
//!
//! # Data Flow
//! ```text
//! GET <page> → access check for the group
//!     → denied:  redirect to the error page
//!     → granted: render "<lang>/<template>" or "<template>" for the default language
//! ```

use std::sync::Arc;

use crate::handler::template::{Outcome, TemplateHandler};
use crate::http::request::RequestContext;
use crate::page::widget::{Page, Widget};
use crate::routing::Scope;
use crate::services::Action;

/// Template-displaying widget, the only widget kind holding child pages.
pub struct StaticWidget {
    display: TemplateHandler,
    pub(crate) sub_pages: Vec<Page>,
}

impl StaticWidget {
    /// Widget rendering `template` to members of `group_id`.
    pub fn new(group_id: u64, template: impl Into<String>) -> Self {
        let template: Arc<str> = template.into().into();
        let display = TemplateHandler::new("staticWidget/displayHandler", move |_, ctx| {
            let template = template.clone();
            Box::pin(async move { localized_template(group_id, &template, ctx).await })
        });
        Self {
            display,
            sub_pages: Vec::new(),
        }
    }
}

impl Widget for StaticWidget {
    fn load_into(&self, scope: &mut Scope<'_>) {
        scope.route("/", self.display.get());
        for page in &self.sub_pages {
            page.load_into(&mut scope.group(page.name()));
        }
    }

    fn as_static(&self) -> Option<&StaticWidget> {
        Some(self)
    }

    fn as_static_mut(&mut self) -> Option<&mut StaticWidget> {
        Some(self)
    }
}

impl Page {
    /// Visible page rendering `template` to members of `group_id`.
    pub fn new_static(name: impl Into<String>, group_id: u64, template: impl Into<String>) -> Self {
        Page::new(name, StaticWidget::new(group_id, template))
    }

    pub fn hidden_static(name: impl Into<String>, group_id: u64, template: impl Into<String>) -> Self {
        Page::hidden(name, StaticWidget::new(group_id, template))
    }
}

/// Template to render for `ctx` after checking access to `group_id`.
///
/// A denied check redirects to the error page carrying the service error key.
pub async fn localized_template(group_id: u64, template: &str, ctx: &RequestContext) -> Outcome {
    let services = ctx.services();
    if let Err(e) = services
        .auth
        .auth_query(ctx.user_id(), group_id, Action::Access)
        .await
    {
        tracing::debug!(group_id, user_id = ctx.user_id(), error = %e, "Access to static page denied");
        return Outcome::redirect(services.errors.default_error_redirect(e.key()));
    }
    Outcome::render(localized_template_name(
        ctx.lang(),
        services.locales.default_lang(),
        template,
    ))
}

/// `"<lang>/<template>"` unless `lang` is the default language.
pub fn localized_template_name(lang: &str, default_lang: &str, template: &str) -> String {
    if lang == default_lang {
        template.to_string()
    } else {
        tracing::info!(lang, template, "Using alternative static page");
        format!("{lang}/{template}")
    }
}
