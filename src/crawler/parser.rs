//! HTML parser for extracting links and assets
//!
//! This module handles parsing HTML content to extract:
//! - Same-host links to follow (from <a> tags)
//! - Asset references (from <img>, <link> and <script> tags)

use crate::url::{resolve_url, same_host};
use crate::ParseError;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Links and assets extracted from one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Same-host page links (absolute, fragment stripped)
    pub links: BTreeSet<String>,

    /// Asset URLs on any host (absolute)
    pub assets: BTreeSet<String>,
}

/// Parses HTML content and extracts links and assets
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` resolving to an http(s) URL on `target_host`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links
/// - Links to any other host
///
/// # Asset Extraction Rules
///
/// Every `<img>`, `<link>` and `<script>` with a `src` (preferred) or `href`
/// that resolves to an http(s) URL, whatever its host.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the content was served from, used to resolve relative URLs
/// * `content_type` - The response Content-Type, if known
/// * `target_host` - Host that followed links must stay on
///
/// # Example
///
/// ```
/// use sitemap_ripple::crawler::parse_page;
///
/// let html = r#"<a href="/a">A</a><img src="/logo.png">"#;
/// let parsed = parse_page(html, "http://site.test/", Some("text/html"), "site.test").unwrap();
/// assert!(parsed.links.contains("http://site.test/a"));
/// assert!(parsed.assets.contains("http://site.test/logo.png"));
/// ```
pub fn parse_page(
    html: &str,
    page_url: &str,
    content_type: Option<&str>,
    target_host: &str,
) -> Result<ParsedPage, ParseError> {
    if let Some(content_type) = content_type {
        if !is_html(content_type) {
            return Err(ParseError::NotHtml {
                url: page_url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    let base = Url::parse(page_url).map_err(|source| ParseError::InvalidBaseUrl {
        url: page_url.to_string(),
        source,
    })?;

    let document = Html::parse_document(html);

    Ok(ParsedPage {
        links: extract_links(&document, &base, target_host)?,
        assets: extract_assets(&document, &base)?,
    })
}

/// Extracts same-host outgoing links from a parsed document
pub fn extract_links(
    document: &Html,
    base_url: &Url,
    target_host: &str,
) -> Result<BTreeSet<String>, ParseError> {
    let anchors = selector("a[href]")?;

    Ok(document
        .select(&anchors)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(href, base_url))
        .filter(|url| same_host(url, target_host))
        .map(String::from)
        .collect())
}

/// Extracts image, stylesheet and script URLs from a parsed document
pub fn extract_assets(document: &Html, base_url: &Url) -> Result<BTreeSet<String>, ParseError> {
    let assets = selector("img, link, script")?;

    Ok(document
        .select(&assets)
        .filter_map(asset_reference)
        .filter_map(|reference| resolve_url(reference, base_url))
        .map(String::from)
        .collect())
}

fn asset_reference<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    let element = element.value();
    element.attr("src").or_else(|| element.attr("href"))
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector(format!("{}: {:?}", css, e)))
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "http://site.test/page";

    fn parse(html: &str) -> ParsedPage {
        parse_page(html, PAGE, Some("text/html"), "site.test").unwrap()
    }

    #[test]
    fn test_extract_relative_link() {
        let parsed = parse(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(parsed.links.len(), 1);
        assert!(parsed.links.contains("http://site.test/other"));
    }

    #[test]
    fn test_extract_relative_path_link() {
        let parsed = parse(r#"<a href="other">Link</a>"#);
        assert!(parsed.links.contains("http://site.test/other"));
    }

    #[test]
    fn test_external_links_are_dropped() {
        let parsed = parse(
            r#"<a href="/a">A</a><a href="http://other.test/x">X</a><a href="http://sub.site.test/">S</a>"#,
        );
        assert_eq!(parsed.links.len(), 1);
        assert!(parsed.links.contains("http://site.test/a"));
    }

    #[test]
    fn test_https_same_host_is_kept() {
        let parsed = parse(r#"<a href="https://site.test/secure">S</a>"#);
        assert!(parsed.links.contains("https://site.test/secure"));
    }

    #[test]
    fn test_skip_special_links() {
        let parsed = parse(
            r##"
            <a href="javascript:void(0)">J</a>
            <a href="mailto:test@site.test">M</a>
            <a href="tel:+1234567890">T</a>
            <a href="data:text/html,<h1>x</h1>">D</a>
            <a href="#section">F</a>
            <a href="">E</a>
            "##,
        );
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let parsed = parse(r#"<a href="/file.pdf" download>Download</a>"#);
        assert!(parsed.links.is_empty());
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let parsed = parse(r#"<a href="/a">1</a><a href="/a#top">2</a><a href="a">3</a>"#);
        assert_eq!(parsed.links.len(), 1);
    }

    #[test]
    fn test_extract_assets() {
        let parsed = parse(
            r#"
            <html>
            <head>
                <link rel="stylesheet" href="/style.css">
                <script src="https://cdn.other.test/lib.js"></script>
                <script>inline()</script>
            </head>
            <body><img src="/logo.png"><img alt="no source"></body>
            </html>
            "#,
        );

        let assets: Vec<&str> = parsed.assets.iter().map(String::as_str).collect();
        assert_eq!(
            assets,
            vec![
                "http://site.test/logo.png",
                "http://site.test/style.css",
                "https://cdn.other.test/lib.js",
            ]
        );
    }

    #[test]
    fn test_asset_prefers_src_over_href() {
        let parsed = parse(r#"<link src="/from-src.css" href="/from-href.css">"#);
        assert_eq!(parsed.assets.len(), 1);
        assert!(parsed.assets.contains("http://site.test/from-src.css"));
    }

    #[test]
    fn test_assets_are_not_links() {
        let parsed = parse(r#"<img src="/logo.png">"#);
        assert!(parsed.links.is_empty());
        assert_eq!(parsed.assets.len(), 1);
    }

    #[test]
    fn test_non_html_content_type() {
        let result = parse_page("{}", PAGE, Some("application/json"), "site.test");
        assert!(matches!(result, Err(ParseError::NotHtml { .. })));
    }

    #[test]
    fn test_missing_content_type_is_treated_as_html() {
        let parsed = parse_page(r#"<a href="/a">A</a>"#, PAGE, None, "site.test").unwrap();
        assert_eq!(parsed.links.len(), 1);
    }

    #[test]
    fn test_xhtml_content_type() {
        assert!(parse_page("", PAGE, Some("application/xhtml+xml"), "site.test").is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = parse_page("", "not a url", Some("text/html"), "site.test");
        assert!(matches!(result, Err(ParseError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let parsed = parse(r#"<html><body><a href="/a">unclosed <div><a href="/b">"#);
        assert_eq!(parsed.links.len(), 2);
    }
}
