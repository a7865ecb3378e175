//! Image URL builder for CMS asset references

use crate::config::CmsConfig;

const CDN_HOST: &str = "https://cdn.sanity.io";

/// Builds CDN URLs from `image-<id>-<w>x<h>-<ext>` asset references
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
    width: Option<u32>,
}

/// A parsed asset reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef<'a> {
    pub id: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: &'a str,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            width: None,
        }
    }

    pub fn from_config(config: &CmsConfig) -> Self {
        Self::new(&config.project_id, &config.dataset)
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Build the URL for an asset reference, `None` if it is malformed
    pub fn url(&self, reference: &str) -> Option<String> {
        let asset = parse_ref(reference)?;
        let mut url = format!(
            "{}/images/{}/{}/{}-{}x{}.{}?auto=format&fit=max",
            CDN_HOST, self.project_id, self.dataset, asset.id, asset.width, asset.height, asset.format
        );
        if let Some(w) = self.width {
            url.push_str(&format!("&w={}", w));
        }
        Some(url)
    }
}

/// Parse `image-<id>-<w>x<h>-<ext>`
pub fn parse_ref(reference: &str) -> Option<AssetRef<'_>> {
    let rest = reference.strip_prefix("image-")?;
    let mut parts = rest.rsplitn(3, '-');
    let format = parts.next()?;
    let dimensions = parts.next()?;
    let id = parts.next()?;

    let (w, h) = dimensions.split_once('x')?;
    let width = w.parse().ok()?;
    let height = h.parse().ok()?;

    if id.is_empty() || format.is_empty() {
        return None;
    }

    Some(AssetRef {
        id,
        width,
        height,
        format,
    })
}
