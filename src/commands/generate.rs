//! Export a static snapshot of the site

use anyhow::Result;

use crate::cms::SanityClient;
use crate::generator::Generator;
use crate::Newsdesk;

/// Render every route into the public directory
pub async fn run(site: &Newsdesk) -> Result<()> {
    let start = std::time::Instant::now();

    let client = SanityClient::from_site_config(&site.config)?;
    let generator = Generator::new(client, site.config.clone())?;
    let pages = generator
        .export(&site.public_dir, &site.static_dir)
        .await?;

    tracing::info!(
        "Generated {} pages in {:.2}s",
        pages,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
