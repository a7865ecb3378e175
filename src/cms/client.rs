use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::{CmsError, IntoCmsResult};
use super::query::{self, Params};
use super::ContentSource;
use crate::cache::{self, QueryCache};
use crate::config::{CmsConfig, SiteConfig};
use crate::content::{Category, Post, PostSummary, RelatedPost};

/// HTTP client for the CMS query API
#[derive(Clone, Debug)]
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: String,
    cache: Option<QueryCache>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct SlugRow {
    #[serde(default)]
    slug: Option<String>,
}

impl SanityClient {
    pub fn new(config: &CmsConfig, cache: Option<QueryCache>) -> Result<Self, CmsError> {
        if config.api_host.is_none() && !is_valid_project_id(&config.project_id) {
            return Err(CmsError::Config(format!(
                "project_id {:?} must be non-empty and contain only ASCII letters, digits or '-'",
                config.project_id
            )));
        }
        if config.dataset.trim().is_empty() {
            return Err(CmsError::Config("dataset must not be empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| CmsError::Config("token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .into_cms("failed to build http client")?;

        Ok(Self {
            http,
            endpoint: config.query_endpoint(),
            cache,
        })
    }

    /// Client with the query cache configured in the site config
    pub fn from_site_config(config: &SiteConfig) -> Result<Self, CmsError> {
        Self::new(&config.cms, QueryCache::from_config(&config.cache))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query and decode its `result`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &Params,
    ) -> Result<T, CmsError> {
        let value = self.fetch_value(query, params).await?;
        serde_json::from_value(value).into_cms("failed to decode query result")
    }

    /// Run a list query; a null result is an empty list
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &Params,
    ) -> Result<Vec<T>, CmsError> {
        let list: Option<Vec<T>> = self.fetch(query, params).await?;
        Ok(list.unwrap_or_default())
    }

    async fn fetch_value(&self, query: &str, params: &Params) -> Result<Value, CmsError> {
        let encoded = query::encode_params(params);
        let key = cache::query_key(query, &encoded);

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                tracing::debug!(query = %query, "Query cache hit");
                return Ok(cached);
            }
        }

        let mut pairs = Vec::with_capacity(encoded.len() + 1);
        pairs.push(("query".to_string(), query.to_string()));
        pairs.extend(encoded);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&pairs)
            .send()
            .await
            .into_cms("failed to send query")?;

        let status = response.status();
        let text = response.text().await.into_cms("failed to read response")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.error.description)
                .unwrap_or(text);
            return Err(CmsError::Status {
                status_code: status,
                message,
            });
        }

        let envelope: QueryResponse =
            serde_json::from_str(&text).into_cms("failed to parse query response")?;

        if let Some(cache) = &self.cache {
            cache.insert(key, envelope.result.clone()).await;
        }

        Ok(envelope.result)
    }
}

fn is_valid_project_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[async_trait]
impl ContentSource for SanityClient {
    async fn posts(&self) -> Result<Vec<PostSummary>, CmsError> {
        self.fetch_list(query::ALL_POSTS, &Params::new()).await
    }

    async fn categories(&self) -> Result<Vec<Category>, CmsError> {
        self.fetch_list(query::ALL_CATEGORIES, &Params::new()).await
    }

    async fn posts_in_category(&self, category_id: &str) -> Result<Vec<PostSummary>, CmsError> {
        let params = query::params([("categoryId", json!(category_id))]);
        self.fetch_list(query::POSTS_IN_CATEGORY, &params).await
    }

    async fn post(&self, slug: &str) -> Result<Option<Post>, CmsError> {
        let params = query::params([("slug", json!(slug))]);
        self.fetch(query::POST_BY_SLUG, &params).await
    }

    async fn related_posts(
        &self,
        category_title: &str,
        slug: &str,
    ) -> Result<Vec<RelatedPost>, CmsError> {
        let params = query::params([("category", json!(category_title)), ("slug", json!(slug))]);
        self.fetch_list(query::RELATED_POSTS, &params).await
    }

    async fn post_slugs(&self) -> Result<Vec<String>, CmsError> {
        let rows: Vec<SlugRow> = self.fetch_list(query::POST_SLUGS, &Params::new()).await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.slug)
            .filter(|s| !s.trim().is_empty())
            .collect())
    }
}
