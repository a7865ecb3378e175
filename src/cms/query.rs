//! GROQ queries issued by the site

use std::collections::BTreeMap;

use serde_json::Value;

/// Query parameters, sent as `$name=<json>`
pub type Params = BTreeMap<String, Value>;

/// All posts, newest first, with cover and category
pub const ALL_POSTS: &str = r#"*[_type == "post"] | order(publishedAt desc) {
  _id,
  title,
  slug,
  publishedAt,
  mainImage{ asset->{url} },
  category->{ _id, title }
}"#;

pub const ALL_CATEGORIES: &str = r#"*[_type == "category"]{ _id, title }"#;

/// Posts referencing a category id, newest first
pub const POSTS_IN_CATEGORY: &str = r#"*[_type == "post" && category._ref == $categoryId] | order(publishedAt desc) {
  _id,
  title,
  slug,
  publishedAt,
  mainImage{ asset->{url} },
  category->{ title }
}"#;

/// A single post with body, category and author
pub const POST_BY_SLUG: &str = r#"*[_type == "post" && slug.current == $slug][0] {
  _id,
  title,
  slug,
  body,
  publishedAt,
  mainImage{ asset->{url} },
  category->{ title },
  author->{
    name,
    bio,
    image{ asset->{url} }
  }
}"#;

/// Posts in the same category title, excluding the current slug
pub const RELATED_POSTS: &str = r#"*[_type == "post" && category->title == $category && slug.current != $slug] | order(publishedAt desc) {
  title,
  slug,
  publishedAt,
  mainImage{ asset->{url} }
}"#;

pub const POST_SLUGS: &str = r#"*[_type == "post" && defined(slug.current)]{ "slug": slug.current }"#;

/// Build a parameter map from `(name, value)` pairs
pub fn params<I, K>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Encode parameters as query-string pairs (`$name`, JSON literal)
pub fn encode_params(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(name, value)| (format!("${}", name.trim_start_matches('$')), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_params() {
        let p = params([("slug", json!("hello-world")), ("limit", json!(4))]);
        let encoded = encode_params(&p);
        assert_eq!(
            encoded,
            vec![
                ("$limit".to_string(), "4".to_string()),
                ("$slug".to_string(), "\"hello-world\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_queries_reference_their_params() {
        assert!(POSTS_IN_CATEGORY.contains("$categoryId"));
        assert!(POST_BY_SLUG.contains("$slug"));
        assert!(RELATED_POSTS.contains("$category") && RELATED_POSTS.contains("$slug"));
    }
}
