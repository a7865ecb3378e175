//! Post, category and author models as projected by the CMS queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::PortableText;
use crate::cms::ImageUrlBuilder;

/// A document slug (`slug.current` in the CMS)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.trim().is_empty()
    }
}

/// Image asset. Queries dereference `asset->{url}`, body images only carry `_ref`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "_ref")]
    pub reference: Option<String>,
}

/// An image field (`mainImage`, `author.image`, body image blocks)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageField {
    #[serde(default)]
    pub asset: Option<Asset>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl ImageField {
    /// The dereferenced asset URL, if the query projected one
    pub fn url(&self) -> Option<&str> {
        self.asset
            .as_ref()
            .and_then(|a| a.url.as_deref())
            .filter(|u| !u.trim().is_empty())
    }

    /// Projected URL, or one built from the asset reference
    pub fn resolve(&self, builder: &ImageUrlBuilder) -> Option<String> {
        if let Some(url) = self.url() {
            return Some(url.to_string());
        }
        let reference = self.asset.as_ref()?.reference.as_deref()?;
        builder.url(reference)
    }
}

/// Returns the resolved image URL or the placeholder
pub fn image_or(image: Option<&ImageField>, builder: &ImageUrlBuilder, placeholder: &str) -> String {
    image
        .and_then(|i| i.resolve(builder))
        .unwrap_or_else(|| placeholder.to_string())
}

/// A category document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Dereferenced `category->{...}` projection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl CategoryRef {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// Dereferenced `author->{...}` projection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
}

/// A post as it appears in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub main_image: Option<ImageField>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl PostSummary {
    pub fn category_title(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.title())
    }
}

/// A post with its body, category and author (`/news/:slug`, `/blog/:slug`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub main_image: Option<ImageField>,
    #[serde(default)]
    pub body: Option<PortableText>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub author: Option<Author>,
}

impl Post {
    pub fn category_title(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.title())
    }

    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|b| !b.is_empty())
    }
}

/// A related post in the same category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPost {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub main_image: Option<ImageField>,
}

impl From<&PostSummary> for RelatedPost {
    fn from(post: &PostSummary) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            published_at: post.published_at,
            main_image: post.main_image.clone(),
        }
    }
}

/// Treats an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses an RFC 3339 timestamp, or a bare date, and yields `None` for anything else
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(parse_datetime))
}

pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
