//! Built-in site templates using the Tera template engine
//!
//! Templates and static assets are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::Labels;
use crate::helpers::ShareLink;

/// Bundled static assets: (route path, content type, body)
pub const ASSETS: &[(&str, &str, &str)] = &[
    ("assets/site.css", "text/css; charset=utf-8", include_str!("site/assets/site.css")),
    (
        "assets/hover.js",
        "application/javascript; charset=utf-8",
        include_str!("site/assets/hover.js"),
    ),
    ("placeholder.svg", "image/svg+xml", include_str!("site/assets/placeholder.svg")),
];

/// Look up a bundled asset by its path (without leading slash)
pub fn asset(path: &str) -> Option<(&'static str, &'static str)> {
    ASSETS
        .iter()
        .find(|(p, _, _)| *p == path.trim_start_matches('/'))
        .map(|(_, content_type, body)| (*content_type, *body))
}

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // View data is HTML-escaped when the generator builds it
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("home.html", include_str!("site/home.html")),
            ("category.html", include_str!("site/category.html")),
            ("news.html", include_str!("site/news.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub home: String,
    pub stylesheet: String,
    pub script: String,
    pub labels: Labels,
}

/// A post card in any listing
#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub title: String,
    /// Title cut for hover previews, escaped after cutting
    pub short_title: String,
    pub href: String,
    pub image: String,
    /// Short date, e.g. 1/15/2024
    pub date: String,
    /// Long date, e.g. Mon Jan 15 2024
    pub published: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub title: String,
    pub posts: Vec<CardData>,
    pub view_more: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewData {
    pub id: String,
    pub title: String,
    pub posts: Vec<CardData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub bio: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub title: String,
    /// Absolute URL of this page
    pub url: String,
    pub published: String,
    pub published_iso: Option<String>,
    pub image: Option<String>,
    pub author: Option<AuthorData>,
    pub body_html: Option<String>,
    pub excerpt: String,
    pub category: String,
    pub share: Vec<ShareLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogData {
    pub title: String,
    pub image: Option<String>,
    pub published: String,
    pub url: String,
    pub paragraphs: Vec<String>,
}
