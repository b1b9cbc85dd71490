// ABOUTME: URL helpers for classifying and normalizing page addresses.
// ABOUTME: Covers host/extension lookup, textual-resource checks, and site resource URLs.

use regex::RegexBuilder;
use url::Url;

use crate::error::SiteError;

// Base used to resolve relative inputs when only the path matters.
const RELATIVE_BASE: &str = "http://relative.invalid/";

const TEXTUAL_EXTENSIONS: &[&str] = &["htm", "html", "xml", "txt"];

/// True if the URL has both a scheme and a host.
pub fn is_full_url(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| parsed.host_str().is_some())
        .unwrap_or(false)
}

/// Host of the URL, with `:port` appended when a non-default port is given.
pub fn host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

fn path_of(url: &str) -> Option<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(url).ok()?
        }
        Err(_) => return None,
    };
    Some(parsed.path().to_string())
}

/// Lowercase extension of the last path segment, or `""` when there is none.
pub fn path_extension(url: &str) -> String {
    let Some(path) = path_of(url) else {
        return String::new();
    };
    let file = path.rsplit('/').next().unwrap_or("");
    match file.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// True if the URL most likely points at a text document.
///
/// Paths without an extension count as textual, as do htm, html, xml and txt.
pub fn is_textual_url(url: &str) -> bool {
    let ext = path_extension(url);
    ext.is_empty() || TEXTUAL_EXTENSIONS.contains(&ext.as_str())
}

/// True if `url` contains `http://<domain>` or `https://<domain>`, ignoring case.
///
/// `domain` may be given with or without a scheme.
pub fn is_same_domain_url(url: &str, domain: &str) -> bool {
    let domain = domain.replace("https://", "").replace("http://", "");
    let pattern = format!(r"https?://{}", regex::escape(&domain));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(url))
        .unwrap_or(false)
}

/// Lowercased URL with its fragment removed.
pub fn normalize_url(url: &str) -> Result<String, SiteError> {
    let mut parsed = Url::parse(url).map_err(|_| SiteError::invalid_url(url))?;
    if parsed.host_str().is_none() {
        return Err(SiteError::invalid_url(url));
    }
    parsed.set_fragment(None);
    Ok(parsed.as_str().to_lowercase())
}

fn require_domain(domain: &str) -> Result<&str, SiteError> {
    if domain.contains('/') {
        return Err(SiteError::not_a_domain(domain));
    }
    Ok(domain)
}

/// Conventional robots.txt location for a bare domain.
pub fn robots_txt_url(domain: &str) -> Result<String, SiteError> {
    let domain = require_domain(domain)?;
    Ok(format!("http://{}/robots.txt", domain))
}

/// Conventional sitemap locations for a bare domain, in lookup order.
pub fn sitemap_urls(domain: &str) -> Result<Vec<String>, SiteError> {
    let domain = require_domain(domain)?;
    Ok(vec![
        format!("http://{}/sitemap.xml", domain),
        format!("http://{}/sitemap.xml.gz", domain),
    ])
}
