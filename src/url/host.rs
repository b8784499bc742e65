use crate::ConfigError;
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_ripple::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a URL lives on the target host
///
/// The comparison is case-insensitive and ignores scheme and port, so
/// `https://Site.test:8443/x` is on host `site.test`.
pub fn same_host(url: &Url, target_host: &str) -> bool {
    url.host_str()
        .map(|host| host.eq_ignore_ascii_case(target_host))
        .unwrap_or(false)
}

/// Turns a command-line target into the seed URL of a crawl
///
/// A bare host (`example.com`, `localhost:8080`) is seeded over plain HTTP;
/// a full `http://` or `https://` URL is used as given.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::url::seed_url_for_host;
///
/// let seed = seed_url_for_host("example.com").unwrap();
/// assert_eq!(seed.as_str(), "http://example.com/");
/// ```
pub fn seed_url_for_host(target: &str) -> Result<Url, ConfigError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ConfigError::InvalidHost("target host is empty".to_string()));
    }

    let candidate = if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    let mut url = Url::parse(&candidate)
        .map_err(|e| ConfigError::InvalidHost(format!("{}: {}", target, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidHost(format!(
            "{}: only http and https are supported",
            target
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidHost(format!("{}: missing hostname", target)));
    }

    url.set_fragment(None);
    Ok(url)
}
