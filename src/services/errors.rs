//! Error-redirect resolver.
//!
//! Maps an error identifier to a user-facing destination: the configured error
//! page with the identifier embedded as the `error` query parameter.

use url::form_urlencoded;

/// Name of the query parameter carrying the error identifier.
pub const ERROR_QUERY_NAME: &str = "error";

/// Builds redirect targets for failed requests.
#[derive(Debug, Clone)]
pub struct ErrorRedirects {
    error_page: String,
}

impl ErrorRedirects {
    pub fn new(error_page: impl Into<String>) -> Self {
        let error_page = error_page.into();
        Self {
            error_page: if error_page.is_empty() {
                "/".to_string()
            } else {
                error_page
            },
        }
    }

    /// Destination shown to the user for the error identified by `key`.
    pub fn default_error_redirect(&self, key: &str) -> String {
        let mut target = self.error_page.clone();
        write_error(&mut target, key);
        target
    }
}

impl Default for ErrorRedirects {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Append the error identifier to an existing redirect target.
pub fn write_error(target: &mut String, key: &str) {
    target.push(if target.contains('?') { '&' } else { '?' });
    target.push_str(ERROR_QUERY_NAME);
    target.push('=');
    target.extend(form_urlencoded::byte_serialize(key.as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_error_redirect() {
        let errors = ErrorRedirects::default();
        assert_eq!(
            errors.default_error_redirect("ErrorNotAuthorized"),
            "/?error=ErrorNotAuthorized"
        );

        let errors = ErrorRedirects::new("/error");
        assert_eq!(errors.default_error_redirect("bad key&x"), "/error?error=bad+key%26x");
    }

    #[test]
    fn test_write_error_appends_to_query() {
        let mut target = "/wiki/en/view/Home?version=2".to_string();
        write_error(&mut target, "WrongLang");
        assert_eq!(target, "/wiki/en/view/Home?version=2&error=WrongLang");
    }

    #[test]
    fn test_empty_error_page_falls_back_to_root() {
        assert_eq!(ErrorRedirects::new("").default_error_redirect("x"), "/?error=x");
    }
}
