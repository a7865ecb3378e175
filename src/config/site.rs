//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `cms.token`
pub const TOKEN_ENV: &str = "SANITY_API_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    /// Image shown for posts and authors without one
    pub placeholder_image: String,

    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub labels: Labels,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Newsdesk".to_string(),
            description: String::new(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            placeholder_image: "/placeholder.svg".to_string(),

            cms: CmsConfig::default(),
            layout: LayoutConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
            labels: Labels::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                tracing::debug!("Using CMS token from {}", TOKEN_ENV);
                self.cms.token = Some(token);
            }
        }
    }
}

/// Headless CMS connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    /// Dated API version, e.g. `2023-05-03`
    pub api_version: String,
    /// Query the CDN edge instead of the live API
    pub use_cdn: bool,
    pub token: Option<String>,
    /// Overrides the computed API host (used for proxies and tests)
    pub api_host: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: "bgqq8r69".to_string(),
            dataset: "production".to_string(),
            api_version: "2023-05-03".to_string(),
            use_cdn: true,
            token: None,
            api_host: None,
            timeout_secs: 10,
        }
    }
}

impl CmsConfig {
    /// Base URL of the query API, without a trailing slash
    pub fn host(&self) -> String {
        match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None if self.use_cdn => format!("https://{}.apicdn.sanity.io", self.project_id),
            None => format!("https://{}.api.sanity.io", self.project_id),
        }
    }

    /// Full query endpoint for the configured dataset
    pub fn query_endpoint(&self) -> String {
        let version = self.api_version.trim_start_matches('v');
        format!(
            "{}/v{}/data/query/{}",
            self.host(),
            version,
            self.dataset
        )
    }
}

/// How many posts each home page block shows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub ticker_size: usize,
    /// The ticker only shows once there are at least this many posts
    pub ticker_min_posts: usize,
    pub sidebar_size: usize,
    pub preview_size: usize,
    pub section_size: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ticker_size: 5,
            ticker_min_posts: 3,
            sidebar_size: 5,
            preview_size: 6,
            section_size: 4,
        }
    }
}

/// In-memory query cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enable: bool,
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ttl_secs: 60,
            max_entries: 256,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// `max-age` of the public `Cache-Control` header
    pub max_age_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
            max_age_secs: 60,
        }
    }
}

/// User-facing headings and empty-state messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub latest_news: String,
    pub latest_updates: String,
    pub sidebar: String,
    pub news_by_category: String,
    pub view_more: String,
    pub latest_stories: String,
    pub no_categories: String,
    pub no_additional_news: String,
    pub no_category_news: String,
    pub no_stories: String,
    pub no_related: String,
    pub no_content: String,
    pub related_in: String,
    pub published_on: String,
    pub not_found: String,
    pub post_not_found: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            latest_news: "Latest News".to_string(),
            latest_updates: "Latest Updates".to_string(),
            sidebar: "తాజా వార్తలు".to_string(),
            news_by_category: "News by Category".to_string(),
            view_more: "View More →".to_string(),
            latest_stories: "Latest Stories".to_string(),
            no_categories: "No categories found.".to_string(),
            no_additional_news: "No additional news.".to_string(),
            no_category_news: "No news found in this category.".to_string(),
            no_stories: "No stories in this category.".to_string(),
            no_related: "No related posts found.".to_string(),
            no_content: "No content available.".to_string(),
            related_in: "Related News in".to_string(),
            published_on: "Published on:".to_string(),
            not_found: "Page Not Found".to_string(),
            post_not_found: "Post Not Found".to_string(),
        }
    }
}
