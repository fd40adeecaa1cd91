//! Uniform error responses.
//!
//! Every failure leaves the server as `{"error": "<message>"}`. Anything
//! unexpected collapses to a 500 with a fixed message; the detail only goes
//! to the server log.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Error type returned by route handlers and middleware.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body declared as JSON but could not be parsed (400).
    #[error("Malformed JSON body: {0}")]
    MalformedJson(String),

    /// Body stream failed before it was fully read (400).
    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    /// Body exceeded the configured limit (413).
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// No mounted prefix matched (404).
    #[error("Not Found")]
    NotFound,

    /// Database failure (500, logged).
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Filesystem failure (500, logged).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else (500, logged).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJson(_) | Self::BodyRead(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::MalformedJson(_) => "Malformed JSON body".to_string(),
            Self::BodyRead(_) => {
                tracing::debug!(error = %self, "Request body aborted");
                "Failed to read request body".to_string()
            }
            Self::PayloadTooLarge { .. } | Self::NotFound => self.to_string(),
            Self::Database(_) | Self::Io(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "Server error");
                INTERNAL_SERVER_ERROR.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Response for a panic caught inside a handler.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Server error: handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_SERVER_ERROR })),
    )
        .into_response()
}

/// Fallback for paths no mount claims.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let response = ApiError::internal("connection pool exhausted at 10.0.0.4").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn io_error_is_500() {
        let err: ApiError = std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let response = ApiError::MalformedJson("expected value at line 1".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Malformed JSON body");
    }

    #[tokio::test]
    async fn aborted_body_is_400_without_detail() {
        let response = ApiError::BodyRead("connection reset by peer".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Failed to read request body" }));
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "Not Found" }));
    }

    #[tokio::test]
    async fn panic_payloads_are_hidden() {
        let response = handle_panic(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Internal Server Error" }));
    }
}
