//! Default data shared by every templated page of a site.

use std::sync::Arc;

use serde::Serialize;

use crate::handler::data::{DataAdder, DataBag};
use crate::http::request::RequestContext;
use crate::page::Page;

/// Top-level navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NavEntry {
    pub name: String,
    pub url: String,
}

/// Links to the visible direct children of `root`.
pub fn navigation(root: &Page) -> Vec<NavEntry> {
    root.visible_sub_pages()
        .map(|page| NavEntry {
            name: page.name().to_string(),
            url: format!("/{}", page.name()),
        })
        .collect()
}

/// `Lang`, `UserId` (logged-in users only), `Pages` and `CurrentUrl`.
pub fn builtin_adders(navigation: Vec<NavEntry>) -> Vec<DataAdder> {
    let navigation = Arc::new(navigation);
    let lang: DataAdder =
        Arc::new(|data: &mut DataBag, ctx: &RequestContext| data.insert("Lang", ctx.lang()));
    let user: DataAdder = Arc::new(|data: &mut DataBag, ctx: &RequestContext| {
        let user_id = ctx.user_id();
        if user_id != 0 {
            data.insert("UserId", user_id);
        }
    });
    let pages: DataAdder = Arc::new(move |data: &mut DataBag, _: &RequestContext| {
        data.insert("Pages", navigation.as_slice())
    });
    let current_url: DataAdder = Arc::new(|data: &mut DataBag, ctx: &RequestContext| {
        data.insert("CurrentUrl", ctx.current_url())
    });
    vec![lang, user, pages, current_url]
}
