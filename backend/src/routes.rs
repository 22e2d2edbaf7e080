use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use dexpush_publisher::DirectReport;
use dexpush_types::Catalog;
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::error::{ApiErrorKind, ApiResult};

#[derive(Debug, Deserialize)]
pub struct PublishParams {
    access_token: Option<String>,
}

impl PublishParams {
    fn access_token(&self) -> Result<&str, ApiErrorKind> {
        match self.access_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiErrorKind::MissingAccessToken),
        }
    }
}

pub async fn publish_direct(
    State(state): State<AppState>,
    Query(params): Query<PublishParams>,
) -> ApiResult<Response> {
    let token = params.access_token()?;

    let catalog = state
        .fetcher
        .fetch_catalog()
        .await
        .map_err(ApiErrorKind::from)?;

    let report = state.pusher.publish_direct(&catalog, token).await;
    Ok(report_response(&report))
}

pub async fn publish_staged(
    State(state): State<AppState>,
    Query(params): Query<PublishParams>,
) -> ApiResult<Response> {
    let token = params.access_token()?;

    let catalog = state
        .fetcher
        .fetch_catalog()
        .await
        .map_err(ApiErrorKind::from)?;

    state
        .pusher
        .publish_staged(&catalog, token)
        .await
        .map_err(ApiErrorKind::from)?;

    Ok(empty_object())
}

// Development aid: shows the scraped shape without pushing anything.
pub async fn catalog(State(state): State<AppState>) -> ApiResult<Json<Catalog>> {
    let catalog = state
        .fetcher
        .fetch_catalog()
        .await
        .map_err(ApiErrorKind::from)?;

    info!(entities = catalog.len(), "catalog served");
    Ok(Json(catalog))
}

pub async fn health_check() -> &'static str {
    "ok"
}

fn report_response(report: &DirectReport) -> Response {
    if report.is_success() {
        return empty_object();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report.render(),
    )
        .into_response()
}

fn empty_object() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "{}",
    )
        .into_response()
}
