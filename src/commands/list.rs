//! List content fetched from the CMS

use anyhow::Result;

use crate::cms::{ContentSource, SanityClient};
use crate::content::grouping;
use crate::Newsdesk;

/// List site content by type
pub async fn run(site: &Newsdesk, content_type: &str) -> Result<()> {
    let client = SanityClient::from_site_config(&site.config)?;
    print!("{}", render(&client, content_type).await?);
    Ok(())
}

/// Build the listing text. Fetch errors are reported, not recovered.
pub async fn render<S: ContentSource>(source: &S, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = source.posts().await?;
            out.push_str(&format!("Posts ({}):\n", posts.len()));
            for post in posts {
                let date = post
                    .published_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                out.push_str(&format!(
                    "  {} - {} [{}] ({})\n",
                    date,
                    post.title,
                    post.slug.as_str(),
                    post.category_title().unwrap_or("-")
                ));
            }
        }
        "category" | "categories" => {
            let (categories, posts) = tokio::join!(source.categories(), source.posts());
            let categories = categories?;
            let grouped = grouping::group_by_category(&posts?);

            out.push_str(&format!("Categories ({}):\n", categories.len()));
            for category in categories {
                let count = grouped.get(&category.title).map_or(0, Vec::len);
                out.push_str(&format!(
                    "  {} ({}) /category/{}\n",
                    category.title,
                    count,
                    grouping::category_slug(&category.title)
                ));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category",
                content_type
            );
        }
    }

    Ok(out)
}
