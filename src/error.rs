use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// Pipeline failures: all of these abort the request, none are retried
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("image generation timed out")]
    Timeout,

    #[error("asset fetch failed: {0}")]
    Fetch(String),
}

// Everything the generate handler can answer with besides 200
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Invalid(String),

    #[error("Too many requests. Please wait a moment.")]
    Throttled,

    #[error("Image generation failed: {0}")]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Throttled => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
