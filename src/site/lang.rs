//! Language-change endpoint.

use axum::http::header;
use axum::response::Response;

use crate::http::request::RequestContext;
use crate::http::response::{found, DEFAULT_TARGET};
use crate::services::locale::{lang_cookie, LANG_NAME};

pub const CHANGE_LANG_PATH: &str = "/changeLang";

/// Query parameter naming where to go after the change.
pub const REDIRECT_QUERY_NAME: &str = "Redirect";

/// Path prefix of the per-language picture files.
pub const LANG_PICTURE_PREFIX: &str = "/langPicture/";

/// Remember the requested language (the default one when unsupported) and go
/// back to the local `Redirect` target.
pub async fn change_lang(ctx: RequestContext) -> Response {
    let lang = ctx.services().locales.check_lang(ctx.query(LANG_NAME));
    let mut response = found(local_target(ctx.query(REDIRECT_QUERY_NAME)));
    match lang_cookie(&lang) {
        Some(cookie) => {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        None => tracing::warn!(lang = %lang, "Invalid lang cookie"),
    }
    response
}

/// Keep only same-site absolute paths.
fn local_target(target: &str) -> &str {
    if target.starts_with('/') && !target.starts_with("//") {
        target
    } else {
        DEFAULT_TARGET
    }
}
