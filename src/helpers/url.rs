//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::content::category_slug;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/news/hello") // -> "/site/news/hello"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain, for a path that already
/// carries the root (as returned by `url_for` or the route helpers)
///
/// # Examples
/// ```ignore
/// full_url_for(&config, &news_path(&config, "a")) // -> "https://example.com/site/news/a"
/// ```
pub fn full_url_for(config: &SiteConfig, rooted_path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    if rooted_path.starts_with('/') {
        format!("{}{}", base, rooted_path)
    } else {
        format!("{}/{}", base, rooted_path)
    }
}

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Percent-encode a query-string value
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Path of the full article view
pub fn news_path(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("news/{}", encode_segment(slug)))
}

/// Path of the minimal article view
pub fn blog_path(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("blog/{}", encode_segment(slug)))
}

/// Path of a category listing, from the category title
pub fn category_path(config: &SiteConfig, title: &str) -> String {
    url_for(
        config,
        &format!("category/{}", encode_segment(&category_slug(title))),
    )
}
