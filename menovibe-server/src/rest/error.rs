use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use menovibe_core::MenovibeError;
use serde_json::json;

/// Error body returned by the task endpoints: `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, detail: detail.into() }
    }

    /// Client errors keep their message; server errors are sanitized unless `expose` is set.
    pub fn from_error(err: &MenovibeError, expose: bool) -> Self {
        match err {
            MenovibeError::InvalidRequest(detail) => Self::bad_request(detail.clone()),
            other => {
                tracing::error!(error = %other, "request failed");
                let detail =
                    if expose { other.to_string() } else { "Internal server error".to_string() };
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, detail }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
