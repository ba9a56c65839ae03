//! Pagination and path-parameter helpers shared by list pages.

use crate::error::ServiceError;
use crate::handler::data::DataBag;
use crate::http::request::RequestContext;

/// Page window requested through `pageNumber`, `pageSize` and `filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page_number: u64,
    pub start: u64,
    pub end: u64,
    pub filter: String,
}

impl Pagination {
    /// Missing or invalid numbers fall back to page 1 and `default_page_size`.
    pub fn from_context(default_page_size: u64, ctx: &RequestContext) -> Self {
        let page_number = match ctx.query("pageNumber").parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => 1,
        };
        let page_size = match ctx.query("pageSize").parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => default_page_size,
        };
        let start = (page_number - 1).saturating_mul(page_size);
        Self {
            page_number,
            start,
            end: start.saturating_add(page_size),
            filter: ctx.query("filter").to_string(),
        }
    }

    /// Navigation entries for a list holding `total` elements.
    pub fn apply(&self, data: &mut DataBag, total: u64) {
        data.insert("Filter", &self.filter);
        if self.page_number != 1 {
            data.insert("PreviousPageNumber", self.page_number - 1);
        }
        if self.end < total {
            data.insert("NextPageNumber", self.page_number + 1);
        }
        data.insert("Total", total);
    }
}

/// Numeric path parameter; an unparsable value is a technical error.
pub fn requested_id(ctx: &RequestContext, param: &str) -> Result<u64, ServiceError> {
    let raw = ctx.param(param);
    raw.parse().map_err(|e| {
        tracing::warn!(param, value = %raw, error = %e, "Failed to parse id from request");
        ServiceError::Technical
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{services_with, TEST_TEMPLATES};
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let ctx = RequestContext::new(services_with(TEST_TEMPLATES, Vec::new()), "/blog");
        let pagination = Pagination::from_context(10, &ctx);
        assert_eq!(
            pagination,
            Pagination { page_number: 1, start: 0, end: 10, filter: String::new() }
        );
    }

    #[test]
    fn test_second_page() {
        let ctx = RequestContext::new(services_with(TEST_TEMPLATES, Vec::new()), "/blog")
            .with_query("pageNumber", "2")
            .with_query("pageSize", "5")
            .with_query("filter", "rust");
        let pagination = Pagination::from_context(10, &ctx);
        assert_eq!(pagination.start, 5);
        assert_eq!(pagination.end, 10);

        let mut data = DataBag::new();
        pagination.apply(&mut data, 12);
        assert_eq!(data.get("Filter"), Some(&json!("rust")));
        assert_eq!(data.get("PreviousPageNumber"), Some(&json!(1)));
        assert_eq!(data.get("NextPageNumber"), Some(&json!(3)));
        assert_eq!(data.get("Total"), Some(&json!(12)));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let ctx = RequestContext::new(services_with(TEST_TEMPLATES, Vec::new()), "/blog")
            .with_query("pageNumber", "0");
        let pagination = Pagination::from_context(10, &ctx);

        let mut data = DataBag::new();
        pagination.apply(&mut data, 10);
        assert!(!data.contains_key("PreviousPageNumber"));
        assert!(!data.contains_key("NextPageNumber"));
    }

    #[test]
    fn test_requested_id() {
        let services = services_with(TEST_TEMPLATES, Vec::new());
        let ctx = RequestContext::new(services.clone(), "/blog/view/12").with_param("postId", "12");
        assert_eq!(requested_id(&ctx, "postId"), Ok(12));

        let ctx = RequestContext::new(services, "/blog/view/x").with_param("postId", "x");
        assert_eq!(requested_id(&ctx, "postId"), Err(ServiceError::Technical));
    }
}
