//! Generator module - renders site pages from CMS content using the built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::cms::{CmsError, ContentSource, ImageUrlBuilder};
use crate::config::SiteConfig;
use crate::content::{
    category_slug, grouping, image_or, plain_paragraphs, to_plain_text, HomeLayout, ImageField,
    PortableTextRenderer, Post, PostSummary, Slug,
};
use crate::helpers::{self, escape_html, truncate_chars};
use crate::templates::{
    self, ArticleData, AuthorData, BlogData, CardData, PreviewData, SectionData, SiteData,
    TemplateRenderer,
};

const UNTITLED: &str = "Untitled Post";
const UNKNOWN_DATE: &str = "Unknown Date";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const NO_BIO: &str = "No bio available.";
const UNKNOWN_CATEGORY: &str = "Unknown Category";

const SHORT_TITLE_CHARS: usize = 80;
const EXCERPT_CHARS: usize = 160;

/// A rendered page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    /// The page is a not-found state and should be served with 404
    pub not_found: bool,
}

impl RenderedPage {
    fn found(html: String) -> Self {
        Self {
            html,
            not_found: false,
        }
    }

    fn missing(html: String) -> Self {
        Self {
            html,
            not_found: true,
        }
    }
}

/// Page generator over a content source
pub struct Generator<S> {
    source: S,
    config: SiteConfig,
    renderer: TemplateRenderer,
    body_renderer: PortableTextRenderer,
    images: ImageUrlBuilder,
    placeholder: String,
    tz: Tz,
}

impl<S: ContentSource> Generator<S> {
    /// Create a new generator
    pub fn new(source: S, config: SiteConfig) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let images = ImageUrlBuilder::from_config(&config.cms);
        let body_renderer = PortableTextRenderer::new(images.clone().width(1200));
        let placeholder = resolve_placeholder(&config);
        let tz = helpers::parse_timezone(&config.timezone);

        Ok(Self {
            source,
            config,
            renderer,
            body_renderer,
            images,
            placeholder,
            tz,
        })
    }

    /// Home page: category previews, ticker, lead story, sidebar and category sections
    pub async fn home(&self) -> Result<RenderedPage> {
        let (posts, categories) = tokio::join!(self.source.posts(), self.source.categories());
        let posts = recover("posts", posts);
        let categories = recover("categories", categories);
        tracing::debug!(
            "Home: {} posts, {} categories",
            posts.len(),
            categories.len()
        );

        let layout_config = &self.config.layout;
        let grouped = grouping::group_by_category(&posts);

        let previews: Vec<PreviewData> =
            grouping::hover_previews(&categories, &grouped, layout_config.preview_size)
                .into_iter()
                .enumerate()
                .map(|(i, preview)| PreviewData {
                    id: format!("preview-{}", i),
                    title: escape_html(&preview.category.title),
                    posts: preview.posts.iter().map(|p| self.summary_card(p)).collect(),
                })
                .collect();

        let layout = HomeLayout::build(&posts, layout_config);

        let sections: Vec<SectionData> =
            grouping::category_sections(&categories, &posts, layout_config.section_size)
                .into_iter()
                .map(|section| SectionData {
                    title: escape_html(&section.category.title),
                    posts: section.posts.iter().map(|p| self.summary_card(p)).collect(),
                    view_more: section
                        .view_more
                        .as_ref()
                        .map(|_| escape_html(&helpers::category_path(&self.config, &section.category.title))),
                })
                .collect();

        let mut context = self.base_context();
        context.insert("previews", &previews);
        context.insert(
            "ticker",
            &layout
                .ticker
                .iter()
                .map(|p| self.summary_card(p))
                .collect::<Vec<_>>(),
        );
        context.insert("lead", &layout.lead.as_ref().map(|p| self.summary_card(p)));
        context.insert(
            "sidebar",
            &layout
                .sidebar
                .iter()
                .map(|p| self.summary_card(p))
                .collect::<Vec<_>>(),
        );
        context.insert("sections", &sections);

        Ok(RenderedPage::found(
            self.renderer.render("home.html", &context)?,
        ))
    }

    /// Category listing. An unknown category renders the empty state.
    pub async fn category(&self, param: &str) -> Result<RenderedPage> {
        let posts = match recover("category", self.source.find_category(param).await) {
            Some(category) => recover(
                "category posts",
                self.source.posts_in_category(&category.id).await,
            ),
            None => {
                tracing::debug!("No category matches {:?}", param);
                Vec::new()
            }
        };

        let cards: Vec<CardData> = posts.iter().map(|p| self.summary_card(p)).collect();

        let mut context = self.base_context();
        context.insert("heading", &escape_html(&param.to_uppercase()));
        context.insert("posts", &cards);

        Ok(RenderedPage::found(
            self.renderer.render("category.html", &context)?,
        ))
    }

    /// Full article view
    pub async fn news(&self, slug: &str) -> Result<RenderedPage> {
        let Some(post) = recover("post", self.source.post(slug).await) else {
            tracing::debug!("No post with slug {:?}", slug);
            return self.not_found_page(&self.config.labels.not_found);
        };

        let related = match post.category_title() {
            Some(category) => recover(
                "related posts",
                self.source.related_posts(category, slug).await,
            ),
            None => Vec::new(),
        };

        let article = self.article(&post, slug);
        let related: Vec<CardData> = related
            .iter()
            .map(|r| self.card(&r.title, &r.slug, r.published_at.as_ref(), r.main_image.as_ref()))
            .collect();

        let mut context = self.base_context();
        context.insert("article", &article);
        context.insert("related", &related);

        Ok(RenderedPage::found(
            self.renderer.render("news.html", &context)?,
        ))
    }

    /// Minimal article view: title, optional image, date and one paragraph per block
    pub async fn blog(&self, slug: &str) -> Result<RenderedPage> {
        let Some(post) = recover("post", self.source.post(slug).await) else {
            return self.not_found_page(&self.config.labels.post_not_found);
        };

        let data = BlogData {
            title: escape_html(post_title(&post)),
            image: post
                .main_image
                .as_ref()
                .and_then(|i| i.resolve(&self.images))
                .map(|url| escape_html(&url)),
            published: self.short_date(post.published_at.as_ref()),
            url: escape_html(&helpers::full_url_for(
                &self.config,
                &helpers::blog_path(&self.config, slug),
            )),
            paragraphs: post
                .body
                .as_ref()
                .map(plain_paragraphs)
                .unwrap_or_default()
                .iter()
                .map(|p| escape_html(p))
                .collect(),
        };

        let mut context = self.base_context();
        context.insert("post", &data);

        Ok(RenderedPage::found(
            self.renderer.render("blog.html", &context)?,
        ))
    }

    /// Generic not-found page
    pub fn not_found(&self) -> Result<RenderedPage> {
        self.not_found_page(&self.config.labels.not_found)
    }

    /// Write a static snapshot of every route under `public_dir`, with the
    /// files of `static_dir` copied to `public_dir/static`.
    /// Returns the number of pages written.
    pub async fn export(&self, public_dir: &Path, static_dir: &Path) -> Result<usize> {
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        let mut written = 0;

        write_page(&public_dir.join("index.html"), &self.home().await?.html)?;
        written += 1;

        write_page(&public_dir.join("404.html"), &self.not_found()?.html)?;
        written += 1;

        let (posts, categories) = tokio::join!(self.source.posts(), self.source.categories());
        let posts = recover("posts", posts);
        let categories = recover("categories", categories);
        let grouped = grouping::group_by_category(&posts);

        for category in &categories {
            if !grouped.contains_key(&category.title) {
                continue;
            }
            let slug = category_slug(&category.title);
            if !is_safe_segment(&slug) {
                tracing::warn!("Skipping category {:?}: unsafe path", category.title);
                continue;
            }
            let page = self.category(&slug).await?;
            write_page(&public_dir.join("category").join(&slug).join("index.html"), &page.html)?;
            written += 1;
        }

        let slugs = recover("post slugs", self.source.post_slugs().await);
        for slug in &slugs {
            if !is_safe_segment(slug) {
                tracing::warn!("Skipping post {:?}: unsafe path", slug);
                continue;
            }
            for (route, page) in [("news", self.news(slug).await?), ("blog", self.blog(slug).await?)] {
                if page.not_found {
                    continue;
                }
                write_page(&public_dir.join(route).join(slug).join("index.html"), &page.html)?;
                written += 1;
            }
        }

        for (path, _, body) in templates::ASSETS {
            write_page(&public_dir.join(path), body)?;
        }

        copy_static_files(static_dir, &public_dir.join("static"))?;

        tracing::info!("Exported {} pages to {:?}", written, public_dir);
        Ok(written)
    }

    fn not_found_page(&self, heading: &str) -> Result<RenderedPage> {
        let mut context = self.base_context();
        context.insert("heading", &escape_html(heading));
        Ok(RenderedPage::missing(
            self.renderer.render("not_found.html", &context)?,
        ))
    }

    fn base_context(&self) -> Context {
        let site = SiteData {
            title: escape_html(&self.config.title),
            description: escape_html(&self.config.description),
            language: escape_html(&self.config.language),
            home: helpers::url_for(&self.config, "/"),
            stylesheet: helpers::url_for(&self.config, "assets/site.css"),
            script: helpers::url_for(&self.config, "assets/hover.js"),
            labels: self.config.labels.clone(),
        };
        let mut context = Context::new();
        context.insert("site", &site);
        context
    }

    fn article(&self, post: &Post, slug: &str) -> ArticleData {
        let title = post_title(post);
        let url = helpers::full_url_for(&self.config, &helpers::news_path(&self.config, slug));

        ArticleData {
            title: escape_html(title),
            url: escape_html(&url),
            published: self.long_date(post.published_at.as_ref()),
            published_iso: post.published_at.as_ref().map(helpers::date_xml),
            image: Some(self.image(post.main_image.as_ref())),
            author: post.author.as_ref().map(|author| AuthorData {
                name: escape_html(non_empty(author.name.as_deref()).unwrap_or(UNKNOWN_AUTHOR)),
                bio: escape_html(non_empty(author.bio.as_deref()).unwrap_or(NO_BIO)),
                image: self.image(author.image.as_ref()),
            }),
            body_html: post
                .body
                .as_ref()
                .filter(|b| !b.is_empty())
                .map(|b| self.body_renderer.render(b)),
            excerpt: escape_html(&truncate_chars(
                &post.body.as_ref().map(to_plain_text).unwrap_or_default(),
                EXCERPT_CHARS,
                "…",
            )),
            category: escape_html(post.category_title().unwrap_or(UNKNOWN_CATEGORY)),
            share: helpers::share_links(title, &url)
                .into_iter()
                .map(|mut link| {
                    link.href = escape_html(&link.href);
                    link
                })
                .collect(),
        }
    }

    fn summary_card(&self, post: &PostSummary) -> CardData {
        self.card(
            &post.title,
            &post.slug,
            post.published_at.as_ref(),
            post.main_image.as_ref(),
        )
    }

    fn card(
        &self,
        title: &str,
        slug: &Slug,
        published_at: Option<&DateTime<Utc>>,
        image: Option<&ImageField>,
    ) -> CardData {
        let href = if slug.is_empty() {
            "#".to_string()
        } else {
            escape_html(&helpers::news_path(&self.config, slug.as_str()))
        };

        let title = non_empty(Some(title)).unwrap_or(UNTITLED);

        CardData {
            title: escape_html(title),
            short_title: escape_html(&truncate_chars(title, SHORT_TITLE_CHARS, "…")),
            href,
            image: self.image(image),
            date: self.short_date(published_at),
            published: self.long_date(published_at),
        }
    }

    fn image(&self, image: Option<&ImageField>) -> String {
        escape_html(&image_or(image, &self.images, &self.placeholder))
    }

    fn short_date(&self, date: Option<&DateTime<Utc>>) -> String {
        date.map(|d| helpers::locale_date(d, self.tz))
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }

    fn long_date(&self, date: Option<&DateTime<Utc>>) -> String {
        date.map(|d| helpers::to_date_string(d, self.tz))
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }
}

/// Log a failed fetch and fall back to an empty value
fn recover<T: Default>(what: &str, result: Result<T, CmsError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!("Error fetching {}: {}", what, e);
        T::default()
    })
}

fn post_title(post: &Post) -> &str {
    non_empty(post.title.as_deref()).unwrap_or(UNTITLED)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn resolve_placeholder(config: &SiteConfig) -> String {
    let placeholder = config.placeholder_image.trim();
    if placeholder.starts_with("http://") || placeholder.starts_with("https://") {
        placeholder.to_string()
    } else {
        helpers::url_for(config, placeholder)
    }
}

/// A slug usable as a single directory name
fn is_safe_segment(slug: &str) -> bool {
    let slug = slug.trim();
    !slug.is_empty()
        && slug != "."
        && !slug.contains("..")
        && !slug.contains('/')
        && !slug.contains('\\')
}

/// Copy user static files to the public directory
fn copy_static_files(static_dir: &Path, dest_dir: &Path) -> Result<()> {
    if !static_dir.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(static_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(static_dir)?;
        let dest = dest_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
    }

    Ok(())
}

fn write_page(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::testing::{sample_source, summary, FakeSource, OfflineSource};

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.title = "Vartha".to_string();
        config.layout.section_size = 2;
        config
    }

    fn generator(source: FakeSource) -> Generator<FakeSource> {
        Generator::new(source, config()).unwrap()
    }

    #[tokio::test]
    async fn test_home_renders_listing() {
        let page = generator(sample_source()).home().await.unwrap();
        assert!(!page.not_found);

        let html = page.html;
        assert!(html.contains("Budget passed"));
        assert!(html.contains("href=\"/news/budget\""));
        // missing cover falls back to the placeholder
        assert!(html.contains("src=\"/placeholder.svg\" alt=\"Rally &lt;today&gt;\""));
        assert!(!html.contains("Rally <today>"));
        // three sports posts with a section size of two
        assert!(html.contains("href=\"/category/local-sports\""));
        assert!(html.contains("preview-2"));
    }

    #[tokio::test]
    async fn test_home_skips_empty_category_sections() {
        let html = generator(sample_source()).home().await.unwrap().html;
        let sections = html.split("News by Category").nth(1).unwrap_or("");
        assert!(sections.contains("<h2>Politics</h2>"));
        assert!(!sections.contains("<h2>Science</h2>"));
    }

    #[tokio::test]
    async fn test_home_survives_failed_fetches() {
        let generator = Generator::new(OfflineSource, config()).unwrap();
        let page = generator.home().await.unwrap();
        assert!(!page.not_found);
        assert!(page.html.contains("No categories found."));
        assert!(page.html.contains("No additional news."));
        assert!(!page.html.contains("lead-image"));
    }

    #[tokio::test]
    async fn test_category_by_slug() {
        let html = generator(sample_source())
            .category("local-sports")
            .await
            .unwrap()
            .html;
        assert!(html.contains("LOCAL-SPORTS News"));
        assert!(html.contains("Cricket final"));
        assert!(html.contains("Chess open"));
        assert!(!html.contains("Budget passed"));
    }

    #[tokio::test]
    async fn test_unknown_category_is_empty_state() {
        let page = generator(sample_source()).category("Weather").await.unwrap();
        assert!(!page.not_found);
        assert!(page.html.contains("No news found in this category."));
    }

    #[tokio::test]
    async fn test_news_known_slug() {
        let page = generator(sample_source()).news("budget").await.unwrap();
        assert!(!page.not_found);
        assert!(page.html.contains("Budget passed"));
        assert!(page.html.contains("The assembly voted."));
        assert!(page.html.contains("Lakshmi"));
        assert!(page.html.contains("No bio available."));
        assert!(page.html.contains("Related News in Politics"));
        assert!(page.html.contains("href=\"/news/rally\""));
        assert!(page.html.contains("Mon Jan 15 2024"));
        assert!(page.html.contains("https://twitter.com/intent/tweet?url="));
        assert!(page
            .html
            .contains("<link rel=\"canonical\" href=\"http://localhost:4000/news/budget\">"));
    }

    #[tokio::test]
    async fn test_article_urls_apply_root_once() {
        let mut config = config();
        config.url = "https://vartha.example".to_string();
        config.root = "/site/".to_string();
        let generator = Generator::new(sample_source(), config).unwrap();

        let html = generator.news("budget").await.unwrap().html;
        assert!(html.contains("href=\"https://vartha.example/site/news/budget\""));
        assert!(html.contains("url=https%3A%2F%2Fvartha%2Eexample%2Fsite%2Fnews%2Fbudget"));
        assert!(!html.contains("/site/site/"));
        assert!(!html.contains("%2Fsite%2Fsite%2F"));
    }

    #[tokio::test]
    async fn test_news_unknown_slug_is_not_found() {
        let page = generator(sample_source()).news("missing").await.unwrap();
        assert!(page.not_found);
        assert!(page.html.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn test_blog_views() {
        let generator = generator(sample_source());

        let page = generator.blog("budget").await.unwrap();
        assert!(!page.not_found);
        assert!(page.html.contains("<p>The assembly voted.</p>"));
        assert!(page.html.contains("<p>Details follow.</p>"));
        assert!(page.html.contains("1/15/2024"));
        assert!(page
            .html
            .contains("<link rel=\"canonical\" href=\"http://localhost:4000/blog/budget\">"));

        let missing = generator.blog("missing").await.unwrap();
        assert!(missing.not_found);
        assert!(missing.html.contains("Post Not Found"));
    }

    #[tokio::test]
    async fn test_detail_with_failed_fetch_is_not_found() {
        let generator = Generator::new(OfflineSource, config()).unwrap();
        assert!(generator.news("budget").await.unwrap().not_found);
        assert!(generator.blog("budget").await.unwrap().not_found);
    }

    #[tokio::test]
    async fn test_export_writes_routes() {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(static_dir.path().join("img")).unwrap();
        fs::write(static_dir.path().join("img/logo.png"), b"png").unwrap();

        let mut source = sample_source();
        source.posts.push(summary("../escape", "Sneaky", None, false));

        let written = generator(source)
            .export(dir.path(), static_dir.path())
            .await
            .unwrap();

        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("404.html").exists());
        assert!(dir.path().join("category/politics/index.html").exists());
        assert!(dir.path().join("category/local-sports/index.html").exists());
        assert!(!dir.path().join("category/science").exists());
        assert!(dir.path().join("news/budget/index.html").exists());
        assert!(dir.path().join("blog/budget/index.html").exists());
        assert!(!dir.path().join("news/rally").exists());
        assert!(dir.path().join("assets/site.css").exists());
        assert!(dir.path().join("placeholder.svg").exists());
        assert!(dir.path().join("static/img/logo.png").exists());
        assert!(!dir.path().parent().unwrap().join("escape").exists());
        // home, 404, two categories, one post in two views
        assert_eq!(written, 6);
    }

    #[tokio::test]
    async fn test_null_title_renders_untitled() {
        let mut source = sample_source();
        let untitled: PostSummary = serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "title": null,
            "slug": { "current": "untitled" },
            "publishedAt": "2024-02-01T00:00:00Z",
            "category": { "_id": "c1", "title": "Politics" }
        }))
        .unwrap();
        source.posts.insert(0, untitled);

        let html = generator(source).home().await.unwrap().html;
        assert!(html.contains("Untitled Post"));
        assert!(html.contains("href=\"/news/untitled\""));
        assert!(html.contains("Budget passed"));
    }

    #[test]
    fn test_short_title_never_splits_entities() {
        let generator = generator(sample_source());
        let title = format!("{}<b> & more", "x".repeat(SHORT_TITLE_CHARS - 1));
        let card = generator.card(&title, &Slug::new("long"), None, None);

        assert_eq!(
            card.short_title,
            format!("{}&lt;…", "x".repeat(SHORT_TITLE_CHARS - 1))
        );
        assert!(card.title.ends_with("&lt;b&gt; &amp; more"));
        assert_eq!(card.title, escape_html(&title));
    }

    #[tokio::test]
    async fn test_excerpt_is_cut_before_escaping() {
        let mut source = sample_source();
        let body = format!("{}&& tail", "y".repeat(EXCERPT_CHARS - 1));
        source.full[0].body = serde_json::from_value(serde_json::json!([{
            "_type": "block",
            "children": [{ "_type": "span", "text": body }]
        }]))
        .unwrap();

        let html = generator(source).news("budget").await.unwrap().html;
        let expected = format!("{}&amp;…", "y".repeat(EXCERPT_CHARS - 1));
        assert!(html.contains(&format!("content=\"{}\"", expected)));
        assert!(!html.contains("&am…"));
    }

    #[test]
    fn test_safe_segment() {
        assert!(is_safe_segment("budget-2024"));
        assert!(is_safe_segment("తెలుగు"));
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment("a/b"));
        assert!(!is_safe_segment(".."));
    }
}
