// ABOUTME: Error types for site helper operations.
// ABOUTME: Provides SiteError with InvalidUrl and NotADomain variants.

use thiserror::Error;

/// Errors raised by URL and site-resource helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteError {
    /// The input could not be parsed as an absolute URL.
    #[error("invalid URL supplied: {0}")]
    InvalidUrl(String),

    /// A bare domain was expected but the input contains a path.
    #[error("domain not supplied: {0}")]
    NotADomain(String),
}

impl SiteError {
    pub fn invalid_url(url: impl Into<String>) -> Self {
        SiteError::InvalidUrl(url.into())
    }

    pub fn not_a_domain(domain: impl Into<String>) -> Self {
        SiteError::NotADomain(domain.into())
    }
}
