//! HTTP server rendering pages on request

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::cms::{ContentSource, SanityClient};
use crate::generator::{Generator, RenderedPage};
use crate::templates;
use crate::Newsdesk;

type AppState<S> = Arc<Generator<S>>;

/// Build the site router
pub fn router<S: ContentSource + 'static>(
    generator: AppState<S>,
    static_dir: &std::path::Path,
    max_age_secs: u64,
) -> Router {
    let cache_control = HeaderValue::try_from(format!("public, max-age={}", max_age_secs))
        .unwrap_or_else(|_| HeaderValue::from_static("public"));

    Router::new()
        .route("/", get(home::<S>))
        .route("/category/:category", get(category::<S>))
        .route("/news/:slug", get(news::<S>))
        .route("/blog/:slug", get(blog::<S>))
        .route("/healthz", get(healthz))
        .route("/assets/*path", get(bundled_asset::<S>))
        .route("/placeholder.svg", get(placeholder))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found::<S>)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            cache_control,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(generator)
}

/// Start the server and run until Ctrl+C
pub async fn start(site: &Newsdesk, ip: &str, port: u16) -> Result<()> {
    let client = SanityClient::from_site_config(&site.config)?;
    tracing::info!("Querying {}", client.endpoint());

    let generator = Arc::new(Generator::new(client, site.config.clone())?);
    let app = router(generator, &site.static_dir, site.config.server.max_age_secs);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
            tracing::info!("Shutdown requested");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn home<S: ContentSource>(State(generator): State<AppState<S>>) -> Response {
    respond(generator.home().await)
}

async fn category<S: ContentSource>(
    State(generator): State<AppState<S>>,
    Path(category): Path<String>,
) -> Response {
    respond(generator.category(&category).await)
}

async fn news<S: ContentSource>(
    State(generator): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Response {
    respond(generator.news(&slug).await)
}

async fn blog<S: ContentSource>(
    State(generator): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Response {
    respond(generator.blog(&slug).await)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn bundled_asset<S: ContentSource>(
    State(generator): State<AppState<S>>,
    Path(path): Path<String>,
) -> Response {
    match templates::asset(&format!("assets/{}", path)) {
        Some((content_type, body)) => ([(CONTENT_TYPE, content_type)], body).into_response(),
        None => respond(generator.not_found()),
    }
}

async fn placeholder() -> Response {
    match templates::asset("placeholder.svg") {
        Some((content_type, body)) => ([(CONTENT_TYPE, content_type)], body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn not_found<S: ContentSource>(State(generator): State<AppState<S>>) -> Response {
    respond(generator.not_found())
}

fn respond(result: Result<RenderedPage>) -> Response {
    match result {
        Ok(page) if page.not_found => (StatusCode::NOT_FOUND, Html(page.html)).into_response(),
        Ok(page) => Html(page.html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
