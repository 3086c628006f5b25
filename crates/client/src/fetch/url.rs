//! URL resolution against the site origin.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a manifest entry or request target into an absolute URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Join relative references (`/blog/`, `css/style.css`) onto `origin`
/// 3. Reject schemes other than http/https
/// 4. Remove fragment (#...), keep query string intact
pub fn resolve(origin: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Whether `url` is served from the same origin as `origin` (scheme, host, port).
pub fn same_origin(origin: &Url, url: &Url) -> bool {
    origin.origin() == url.origin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://blog.example").unwrap()
    }

    #[test]
    fn test_resolve_absolute_path() {
        let url = resolve(&origin(), "/blog/").unwrap();
        assert_eq!(url.as_str(), "https://blog.example/blog/");
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = resolve(&origin(), "css/style.css").unwrap();
        assert_eq!(url.as_str(), "https://blog.example/css/style.css");
    }

    #[test]
    fn test_resolve_full_url_kept() {
        let url = resolve(&origin(), "https://cdn.example/lib.js").unwrap();
        assert_eq!(url.host_str(), Some("cdn.example"));
    }

    #[test]
    fn test_resolve_remove_fragment_keep_query() {
        let url = resolve(&origin(), "/posts/a/?ref=feed#comments").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("ref=feed"));
    }

    #[test]
    fn test_resolve_trim_whitespace() {
        let url = resolve(&origin(), "  /  ").unwrap();
        assert_eq!(url.as_str(), "https://blog.example/");
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve(&origin(), "file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve(&origin(), ""), Err(UrlError::Empty)));
        assert!(matches!(resolve(&origin(), "   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_same_origin() {
        let o = origin();
        assert!(same_origin(&o, &Url::parse("https://blog.example/posts/").unwrap()));
        assert!(same_origin(&o, &Url::parse("https://BLOG.example:443/").unwrap()));
        assert!(!same_origin(&o, &Url::parse("http://blog.example/").unwrap()));
        assert!(!same_origin(&o, &Url::parse("https://cdn.example/").unwrap()));
        assert!(!same_origin(&o, &Url::parse("https://blog.example:8443/").unwrap()));
    }
}
