//! In-memory content sources for tests

use async_trait::async_trait;
use serde_json::json;

use super::{CmsError, ContentSource};
use crate::content::{Category, Post, PostSummary, RelatedPost};

/// Serves fixed documents
#[derive(Default)]
pub struct FakeSource {
    pub posts: Vec<PostSummary>,
    pub categories: Vec<Category>,
    pub full: Vec<Post>,
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn posts(&self) -> Result<Vec<PostSummary>, CmsError> {
        Ok(self.posts.clone())
    }

    async fn categories(&self) -> Result<Vec<Category>, CmsError> {
        Ok(self.categories.clone())
    }

    async fn posts_in_category(&self, category_id: &str) -> Result<Vec<PostSummary>, CmsError> {
        Ok(self
            .posts
            .iter()
            .filter(|p| {
                p.category.as_ref().and_then(|c| c.id.as_deref()) == Some(category_id)
            })
            .cloned()
            .collect())
    }

    async fn post(&self, slug: &str) -> Result<Option<Post>, CmsError> {
        Ok(self.full.iter().find(|p| p.slug.as_str() == slug).cloned())
    }

    async fn related_posts(
        &self,
        category_title: &str,
        slug: &str,
    ) -> Result<Vec<RelatedPost>, CmsError> {
        Ok(self
            .posts
            .iter()
            .filter(|p| p.category_title() == Some(category_title) && p.slug.as_str() != slug)
            .map(RelatedPost::from)
            .collect())
    }

    async fn post_slugs(&self) -> Result<Vec<String>, CmsError> {
        Ok(self.posts.iter().map(|p| p.slug.current.clone()).collect())
    }
}

/// Every query fails
pub struct OfflineSource;

fn offline() -> CmsError {
    CmsError::Config("offline".to_string())
}

#[async_trait]
impl ContentSource for OfflineSource {
    async fn posts(&self) -> Result<Vec<PostSummary>, CmsError> {
        Err(offline())
    }

    async fn categories(&self) -> Result<Vec<Category>, CmsError> {
        Err(offline())
    }

    async fn posts_in_category(&self, _: &str) -> Result<Vec<PostSummary>, CmsError> {
        Err(offline())
    }

    async fn post(&self, _: &str) -> Result<Option<Post>, CmsError> {
        Err(offline())
    }

    async fn related_posts(&self, _: &str, _: &str) -> Result<Vec<RelatedPost>, CmsError> {
        Err(offline())
    }

    async fn post_slugs(&self) -> Result<Vec<String>, CmsError> {
        Err(offline())
    }
}

pub fn summary(slug: &str, title: &str, category: Option<(&str, &str)>, image: bool) -> PostSummary {
    let main_image = if image {
        json!({ "asset": { "url": format!("https://cdn.example.com/{}.jpg", slug) } })
    } else {
        serde_json::Value::Null
    };
    serde_json::from_value(json!({
        "_id": format!("id-{}", slug),
        "title": title,
        "slug": { "current": slug },
        "publishedAt": "2024-01-15T10:00:00Z",
        "mainImage": main_image,
        "category": category.map(|(id, title)| json!({ "_id": id, "title": title })),
    }))
    .unwrap()
}

/// Politics (2 posts), Local Sports (3) and an empty Science category;
/// only `budget` has a full document
pub fn sample_source() -> FakeSource {
    let politics = Some(("c1", "Politics"));
    let sports = Some(("c2", "Local Sports"));

    let full: Post = serde_json::from_value(json!({
        "_id": "id-budget",
        "title": "Budget passed",
        "slug": { "current": "budget" },
        "publishedAt": "2024-01-15T10:00:00Z",
        "body": [
            { "_type": "block", "style": "normal", "children": [{ "_type": "span", "text": "The assembly voted." }] },
            { "_type": "block", "style": "normal", "children": [{ "_type": "span", "text": "Details follow." }] }
        ],
        "category": { "title": "Politics" },
        "author": { "name": "Lakshmi", "bio": null, "image": null }
    }))
    .unwrap();

    FakeSource {
        posts: vec![
            summary("budget", "Budget passed", politics, true),
            summary("rally", "Rally <today>", politics, false),
            summary("cricket", "Cricket final", sports, true),
            summary("kabaddi", "Kabaddi league", sports, true),
            summary("chess", "Chess open", sports, true),
        ],
        categories: vec![
            Category::new("c1", "Politics"),
            Category::new("c2", "Local Sports"),
            Category::new("c3", "Science"),
        ],
        full: vec![full],
    }
}
