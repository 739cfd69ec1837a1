use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the pipeline and its external collaborators.
///
/// Only `Schema` (index build) and unrecovered provider errors are meant to
/// reach a caller. Rerank failures are absorbed by the reranker's fallback
/// policy, an exact-lookup miss is an `Option::None`, and stats problems are
/// logged and dropped.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("corpus schema error: {0}")]
    Schema(String),
    #[error("corpus read error: {0}")]
    Csv(#[from] csv::Error),
    #[error("embedding provider error: {0}")]
    Embedding(String),
    #[error("vector store error: {0}")]
    Store(String),
    #[error("generation provider error: {0}")]
    Generation(String),
    #[error("rerank provider error: {0}")]
    Rerank(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let res = ApiError::BadRequest("query must not be empty".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pipeline_errors_map_to_500() {
        let err: ApiError = RagError::Generation("provider down".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
