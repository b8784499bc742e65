use url::Url;

/// Resolves an href against a base URL into a canonical absolute URL
///
/// Returns None if the href should be excluded:
/// - empty or fragment-only hrefs (same page anchors)
/// - javascript:, mailto:, tel: schemes and data: URIs
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// The fragment is dropped from the resolved URL; nothing else is rewritten,
/// so two hrefs name the same page only if they resolve to the same string.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("http://site.test/docs/").unwrap();
/// let url = resolve_url("intro#top", &base).unwrap();
/// assert_eq!(url.as_str(), "http://site.test/docs/intro");
/// ```
pub fn resolve_url(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("http://site.test/section/page").unwrap()
    }

    #[test]
    fn test_resolve_absolute_link() {
        let result = resolve_url("https://other.test/x", &base_url()).unwrap();
        assert_eq!(result.as_str(), "https://other.test/x");
    }

    #[test]
    fn test_resolve_root_relative_link() {
        let result = resolve_url("/a", &base_url()).unwrap();
        assert_eq!(result.as_str(), "http://site.test/a");
    }

    #[test]
    fn test_resolve_path_relative_link() {
        let result = resolve_url("other", &base_url()).unwrap();
        assert_eq!(result.as_str(), "http://site.test/section/other");
    }

    #[test]
    fn test_resolve_parent_relative_link() {
        let result = resolve_url("../up", &base_url()).unwrap();
        assert_eq!(result.as_str(), "http://site.test/up");
    }

    #[test]
    fn test_resolve_scheme_relative_link() {
        let result = resolve_url("//site.test/b", &base_url()).unwrap();
        assert_eq!(result.as_str(), "http://site.test/b");
    }

    #[test]
    fn test_fragment_is_dropped() {
        let result = resolve_url("/a#section", &base_url()).unwrap();
        assert_eq!(result.as_str(), "http://site.test/a");
    }

    #[test]
    fn test_query_is_kept() {
        let result = resolve_url("/search?q=rust&page=2", &base_url()).unwrap();
        assert_eq!(result.as_str(), "http://site.test/search?q=rust&page=2");
    }

    #[test]
    fn test_skip_fragment_only() {
        assert_eq!(resolve_url("#top", &base_url()), None);
    }

    #[test]
    fn test_skip_empty() {
        assert_eq!(resolve_url("   ", &base_url()), None);
    }

    #[test]
    fn test_skip_special_schemes() {
        assert_eq!(resolve_url("javascript:void(0)", &base_url()), None);
        assert_eq!(resolve_url("mailto:someone@site.test", &base_url()), None);
        assert_eq!(resolve_url("tel:+1234567890", &base_url()), None);
        assert_eq!(resolve_url("data:image/png;base64,AAAA", &base_url()), None);
        assert_eq!(resolve_url("JavaScript:alert(1)", &base_url()), None);
    }

    #[test]
    fn test_skip_non_http_scheme() {
        assert_eq!(resolve_url("ftp://site.test/file", &base_url()), None);
    }
}
