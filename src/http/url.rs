//! Base-URL path algebra.
//!
//! Ancestor URLs are computed from the current request path by counting `/`
//! separators, so feature widgets can build links "two levels up" without
//! hardcoding absolute paths.

/// Request path normalized to end with `/`.
pub fn current_url(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Prefix of the current URL once `levels_to_erase` trailing segments are removed.
///
/// The result always ends with `/`. Erasing more levels than the path holds
/// yields `/`.
pub fn base_url(levels_to_erase: usize, path: &str) -> String {
    let current = current_url(path);
    let bytes = current.as_bytes();
    let mut end = bytes.len() - 1;
    let mut count = 0;
    while count < levels_to_erase {
        if end == 0 {
            return "/".to_string();
        }
        end -= 1;
        if bytes[end] == b'/' {
            count += 1;
        }
    }
    current[..=end].to_string()
}
