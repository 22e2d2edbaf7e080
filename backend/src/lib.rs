//! HTTP entrypoints for scraping the catalog and pushing it to the index.

pub mod error;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, body::Body, http::Request, routing::get};
use dexpush_publisher::{CatalogFetcher, PublisherConfig, PushClient, utils::build_http_client};
use tower_http::trace::TraceLayer;
use tracing::Span;

pub use error::{ApiErrorKind, AppError};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<CatalogFetcher>,
    pub pusher: Arc<PushClient>,
}

impl AppState {
    pub fn from_config(config: &PublisherConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let fetcher =
            CatalogFetcher::new(client.clone(), config).context("invalid catalog configuration")?;
        let pusher = PushClient::new(client, config).context("invalid push API url")?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            pusher: Arc::new(pusher),
        })
    }
}

/// Route table of the service. The short legacy paths stay as aliases.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/publish",
            get(routes::publish_direct).post(routes::publish_direct),
        )
        .route(
            "/api/v1/publish/staged",
            get(routes::publish_staged).post(routes::publish_staged),
        )
        .route("/api/v1/catalog", get(routes::catalog))
        .route(
            "/FillIndex",
            get(routes::publish_direct).post(routes::publish_direct),
        )
        .route(
            "/FillIndexS3",
            get(routes::publish_staged).post(routes::publish_staged),
        )
        .route("/pokedex", get(routes::catalog))
        .route("/healthz", get(routes::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

// Records the path only. The query carries the caller's access_token.
fn request_span(request: &Request<Body>) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}
