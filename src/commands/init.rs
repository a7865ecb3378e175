//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Newsdesk Configuration

# Site
title: Newsdesk
description: ''
language: en
timezone: UTC

# URL
url: http://localhost:4000
root: /

# Directory
public_dir: public
static_dir: static

# Shown when a post has no cover image
placeholder_image: /placeholder.svg

# Headless CMS
# The read token can also be set with the SANITY_API_TOKEN environment variable.
cms:
  project_id: bgqq8r69
  dataset: production
  api_version: '2023-05-03'
  use_cdn: true
  timeout_secs: 10

# Home page blocks
layout:
  ticker_size: 5
  ticker_min_posts: 3
  sidebar_size: 5
  preview_size: 6
  section_size: 4

# Query cache
cache:
  enable: true
  ttl_secs: 60
  max_entries: 256

# Server
server:
  ip: localhost
  port: 4000
  max_age_secs: 60
"#;

/// Initialize a new site in the given directory.
/// An existing `_config.yml` is left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("static"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::warn!("{:?} already exists, keeping it", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::debug!("Created: {:?}", config_path);
    }

    Ok(())
}
