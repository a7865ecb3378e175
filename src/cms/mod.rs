//! Read-only access to the headless CMS
//!
//! [`ContentSource`] is the seam the page generator talks to. [`SanityClient`]
//! implements it over the CMS's HTTP query API.

mod client;
mod error;
mod image;
pub mod query;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use client::SanityClient;
pub use error::{CmsError, IntoCmsResult};
pub use image::{parse_ref, AssetRef, ImageUrlBuilder};

use crate::content::{grouping, Category, Post, PostSummary, RelatedPost};

/// Queries the site issues against the document store
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All posts, newest first
    async fn posts(&self) -> Result<Vec<PostSummary>, CmsError>;

    async fn categories(&self) -> Result<Vec<Category>, CmsError>;

    /// Posts referencing the category id, newest first
    async fn posts_in_category(&self, category_id: &str) -> Result<Vec<PostSummary>, CmsError>;

    /// A single post with body, category and author
    async fn post(&self, slug: &str) -> Result<Option<Post>, CmsError>;

    /// Posts in the category with this title, excluding `slug`, newest first
    async fn related_posts(
        &self,
        category_title: &str,
        slug: &str,
    ) -> Result<Vec<RelatedPost>, CmsError>;

    /// Every post slug
    async fn post_slugs(&self) -> Result<Vec<String>, CmsError>;

    /// Resolve a category route parameter (a title or its slug form)
    async fn find_category(&self, param: &str) -> Result<Option<Category>, CmsError> {
        let categories = self.categories().await?;
        Ok(grouping::match_category(&categories, param).cloned())
    }
}
