use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dexpush_publisher::errors::ERROR_NO_ACCESS_TOKEN;
use dexpush_publisher::{FetchError, StagedPublishError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiErrorKind {
    #[error("missing access_token")]
    MissingAccessToken,
    #[error("catalog retrieval failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("staged publish failed: {0}")]
    Staged(#[from] StagedPublishError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ApiErrorKind> for AppError {
    fn from(kind: ApiErrorKind) -> Self {
        match kind {
            ApiErrorKind::MissingAccessToken => {
                warn!("request rejected without access_token");
                AppError::new(StatusCode::BAD_REQUEST, ERROR_NO_ACCESS_TOKEN)
            }
            ApiErrorKind::Fetch(err) => {
                error!(error = %err, "catalog retrieval failed");
                AppError::new(StatusCode::BAD_GATEWAY, err.public_message())
            }
            ApiErrorKind::Staged(err) => {
                let status = match &err {
                    StagedPublishError::Payload(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_GATEWAY,
                };
                AppError::new(status, err.public_message())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, AppError>;
