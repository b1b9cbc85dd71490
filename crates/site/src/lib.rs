// ABOUTME: Site-level helpers for webtools: URL classification, sitemap and robots.txt parsing.
// ABOUTME: Pure string functions; fetching robots.txt or sitemaps is left to callers.

pub mod error;
pub mod robots;
pub mod sitemap;
pub mod urls;

pub use error::SiteError;
pub use robots::{RobotsTxt, DEFAULT_USER_AGENT};
pub use sitemap::sitemap_locations;
pub use urls::{
    host, is_full_url, is_same_domain_url, is_textual_url, normalize_url, path_extension,
    robots_txt_url, sitemap_urls,
};
