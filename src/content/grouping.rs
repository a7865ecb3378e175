//! Grouping and slicing of post listings for the home and category pages

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use super::{Category, PostSummary};
use crate::config::LayoutConfig;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// URL form of a category title: whitespace runs become `-`, lowercased
pub fn category_slug(title: &str) -> String {
    WHITESPACE.replace_all(title, "-").to_lowercase()
}

/// Find the category a route parameter refers to.
///
/// The exact title wins; otherwise the parameter is compared in slug form,
/// which is what the "View More" links produce.
pub fn match_category<'a>(categories: &'a [Category], param: &str) -> Option<&'a Category> {
    let param = param.trim();
    if param.is_empty() {
        return None;
    }
    if let Some(exact) = categories.iter().find(|c| c.title == param) {
        return Some(exact);
    }
    let wanted = category_slug(param);
    categories
        .iter()
        .find(|c| !c.title.is_empty() && category_slug(&c.title) == wanted)
}

/// Group posts by category title, in order of first appearance.
/// Posts without a category title are left out.
pub fn group_by_category(posts: &[PostSummary]) -> IndexMap<String, Vec<PostSummary>> {
    let mut grouped: IndexMap<String, Vec<PostSummary>> = IndexMap::new();
    for post in posts {
        if let Some(title) = post.category_title() {
            grouped.entry(title.to_string()).or_default().push(post.clone());
        }
    }
    grouped
}

/// One "news by category" block
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySection {
    pub category: Category,
    /// The first `size` posts
    pub posts: Vec<PostSummary>,
    /// Total number of posts in the category
    pub total: usize,
    /// Slug of the full category listing, only when posts were cut off
    pub view_more: Option<String>,
}

/// Build the category sections in category order, skipping empty categories
pub fn category_sections(
    categories: &[Category],
    posts: &[PostSummary],
    size: usize,
) -> Vec<CategorySection> {
    categories
        .iter()
        .filter_map(|category| {
            let matching: Vec<&PostSummary> = posts
                .iter()
                .filter(|p| p.category_title() == Some(category.title.as_str()))
                .collect();
            if matching.is_empty() {
                return None;
            }

            let total = matching.len();
            let view_more = (total > size).then(|| category_slug(&category.title));
            Some(CategorySection {
                category: category.clone(),
                posts: matching.into_iter().take(size).cloned().collect(),
                total,
                view_more,
            })
        })
        .collect()
}

/// The dropdown shown when hovering a category in the navigation strip
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPreview {
    pub category: Category,
    pub posts: Vec<PostSummary>,
}

/// One preview per titled category, with up to `size` of its posts
pub fn hover_previews(
    categories: &[Category],
    grouped: &IndexMap<String, Vec<PostSummary>>,
    size: usize,
) -> Vec<HoverPreview> {
    categories
        .iter()
        .filter(|c| !c.title.trim().is_empty())
        .map(|category| HoverPreview {
            category: category.clone(),
            posts: grouped
                .get(&category.title)
                .map(|posts| posts.iter().take(size).cloned().collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// The lead story, ticker and sidebar picked from the newest-first post list
#[derive(Debug, Clone, PartialEq)]
pub struct HomeLayout {
    pub lead: Option<PostSummary>,
    pub ticker: Vec<PostSummary>,
    pub sidebar: Vec<PostSummary>,
}

impl HomeLayout {
    pub fn build(posts: &[PostSummary], layout: &LayoutConfig) -> Self {
        let ticker = if posts.len() >= layout.ticker_min_posts {
            posts.iter().take(layout.ticker_size).cloned().collect()
        } else {
            Vec::new()
        };

        Self {
            lead: posts.first().cloned(),
            ticker,
            sidebar: posts
                .iter()
                .skip(1)
                .take(layout.sidebar_size)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CategoryRef, Slug};

    fn post(id: &str, category: Option<&str>) -> PostSummary {
        PostSummary {
            id: id.to_string(),
            title: format!("Post {}", id),
            slug: Slug::new(id),
            published_at: None,
            main_image: None,
            category: category.map(|t| CategoryRef {
                id: None,
                title: Some(t.to_string()),
            }),
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category::new("c1", "Andhra Pradesh"),
            Category::new("c2", "Sports"),
            Category::new("c3", "Cinema"),
        ]
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(category_slug("Andhra  Pradesh"), "andhra-pradesh");
        assert_eq!(category_slug("Sports"), "sports");
        assert_eq!(category_slug("తెలంగాణ వార్తలు"), "తెలంగాణ-వార్తలు");
    }

    #[test]
    fn test_match_category() {
        let cats = categories();
        assert_eq!(match_category(&cats, "Sports").unwrap().id, "c2");
        assert_eq!(match_category(&cats, "andhra-pradesh").unwrap().id, "c1");
        assert!(match_category(&cats, "politics").is_none());
        assert!(match_category(&cats, "  ").is_none());
    }

    #[test]
    fn test_group_by_category_skips_uncategorized() {
        let posts = vec![
            post("1", Some("Sports")),
            post("2", None),
            post("3", Some("Cinema")),
            post("4", Some("Sports")),
        ];
        let grouped = group_by_category(&posts);
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["Sports", "Cinema"]);
        assert_eq!(grouped["Sports"].len(), 2);
        assert_eq!(grouped["Sports"][1].id, "4");
    }

    #[test]
    fn test_sections_skip_empty_categories() {
        let posts = vec![post("1", Some("Sports")), post("2", Some("Cinema"))];
        let sections = category_sections(&categories(), &posts, 4);
        let titles: Vec<_> = sections.iter().map(|s| s.category.title.as_str()).collect();
        assert_eq!(titles, vec!["Sports", "Cinema"]);
        assert!(sections.iter().all(|s| s.view_more.is_none()));
    }

    #[test]
    fn test_sections_truncate_and_link() {
        let posts: Vec<_> = (0..6)
            .map(|i| post(&i.to_string(), Some("Andhra Pradesh")))
            .collect();
        let sections = category_sections(&categories(), &posts, 4);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].posts.len(), 4);
        assert_eq!(sections[0].total, 6);
        assert_eq!(sections[0].view_more.as_deref(), Some("andhra-pradesh"));

        let exact: Vec<_> = posts.into_iter().take(4).collect();
        let sections = category_sections(&categories(), &exact, 4);
        assert!(sections[0].view_more.is_none());
    }

    #[test]
    fn test_hover_previews() {
        let mut cats = categories();
        cats.push(Category::new("c4", ""));
        let posts: Vec<_> = (0..8).map(|i| post(&i.to_string(), Some("Sports"))).collect();
        let grouped = group_by_category(&posts);

        let previews = hover_previews(&cats, &grouped, 6);
        assert_eq!(previews.len(), 3);
        assert!(previews[0].posts.is_empty());
        assert_eq!(previews[1].posts.len(), 6);
    }

    #[test]
    fn test_home_layout() {
        let layout = LayoutConfig::default();
        let posts: Vec<_> = (0..8).map(|i| post(&i.to_string(), None)).collect();
        let home = HomeLayout::build(&posts, &layout);
        assert_eq!(home.lead.unwrap().id, "0");
        assert_eq!(home.ticker.len(), 5);
        let sidebar: Vec<_> = home.sidebar.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(sidebar, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_home_layout_small() {
        let layout = LayoutConfig::default();
        let posts = vec![post("0", None), post("1", None)];
        let home = HomeLayout::build(&posts, &layout);
        assert!(home.ticker.is_empty());
        assert_eq!(home.sidebar.len(), 1);

        let empty = HomeLayout::build(&[], &layout);
        assert!(empty.lead.is_none());
        assert!(empty.sidebar.is_empty());
    }
}
