//! Failure kinds surfaced by the API and their fixed JSON rendering.

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every handler failure ends up as one of these. The cause is logged, never rendered.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(cause: impl Display) -> Self {
        Self::BadRequest(cause.to_string())
    }

    pub fn not_found(cause: impl Display) -> Self {
        Self::NotFound(cause.to_string())
    }

    pub fn method_not_allowed(cause: impl Display) -> Self {
        Self::MethodNotAllowed(cause.to_string())
    }

    pub fn unprocessable(cause: impl Display) -> Self {
        Self::Unprocessable(cause.to_string())
    }

    pub fn internal(cause: impl Display) -> Self {
        Self::Internal(cause.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad request",
            Self::NotFound(_) => "resource not found",
            Self::MethodNotAllowed(_) => "method not allowed",
            Self::Unprocessable(_) => "unprocessable",
            Self::Internal(_) => "internal server error",
        }
    }
}

/// The body shared by all error responses.
pub fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "error": status.as_u16(),
        "message": message,
    }));
    (status, body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(_) => tracing::error!("{self}"),
            _ => tracing::info!("{self}"),
        }
        error_body(self.status(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = render(ApiError::not_found("page 1000 is empty")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": 404, "message": "resource not found"})
        );
    }

    #[tokio::test]
    async fn unprocessable_is_422() {
        let (status, body) = render(ApiError::unprocessable("missing answer")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "unprocessable");
        assert_eq!(body["error"], 422);
    }

    #[tokio::test]
    async fn method_not_allowed_is_405() {
        let (status, body) = render(ApiError::method_not_allowed("PUT /questions")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body,
            json!({"success": false, "error": 405, "message": "method not allowed"})
        );
    }

    #[tokio::test]
    async fn bad_request_is_400() {
        let (status, body) = render(ApiError::bad_request("boom")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request");
    }

    #[tokio::test]
    async fn cause_is_not_exposed() {
        let (status, body) = render(ApiError::internal("disk I/O error at /var/db")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal server error");
        assert!(!body.to_string().contains("/var/db"));
    }
}
