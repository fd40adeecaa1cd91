//! JSON body validation.
//!
//! Requests that declare a JSON body are buffered and checked before any
//! route handler runs, so handlers never see malformed input. Validation
//! uses `IgnoredAny` and does not build a value tree.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::LengthLimitError;
use serde::de::IgnoredAny;

use crate::http::error::ApiError;

/// Maximum accepted JSON body size in bytes.
#[derive(Debug, Clone, Copy)]
pub struct JsonBodyLimit(pub usize);

pub async fn json_body_middleware(
    State(JsonBodyLimit(limit)): State<JsonBodyLimit>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !declares_json(request.headers()) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, limit)
        .await
        .map_err(|e| body_error(e, limit))?;

    check_json(&bytes)?;

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

/// Only an exceeded limit is a 413. Any other read failure is a 400.
fn body_error(err: axum::Error, limit: usize) -> ApiError {
    let inner = err.into_inner();
    let root: &(dyn std::error::Error + 'static) = &*inner;
    let mut source = Some(root);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return ApiError::PayloadTooLarge { limit };
        }
        source = e.source();
    }
    ApiError::BodyRead(inner.to_string())
}

/// `application/json`, with or without parameters.
pub fn declares_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
}

/// Empty bodies pass. Otherwise the top level must be an object or array;
/// whitespace alone is not a value.
fn check_json(bytes: &[u8]) -> Result<(), ApiError> {
    if bytes.is_empty() {
        return Ok(());
    }

    let Some(first) = bytes.iter().find(|b| !b.is_ascii_whitespace()) else {
        return Err(ApiError::MalformedJson("body is only whitespace".to_string()));
    };

    if *first != b'{' && *first != b'[' {
        return Err(ApiError::MalformedJson(
            "top-level value must be an object or array".to_string(),
        ));
    }

    serde_json::from_slice::<IgnoredAny>(bytes)
        .map(|_| ())
        .map_err(|e| ApiError::MalformedJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Method, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::post;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(hits: Arc<AtomicUsize>, limit: usize) -> Router {
        Router::new()
            .route(
                "/echo",
                post(move |body: String| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        body
                    }
                }),
            )
            .layer(from_fn_with_state(JsonBodyLimit(limit), json_body_middleware))
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn detects_json_media_types() {
        let mut headers = HeaderMap::new();
        assert!(!declares_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("Application/JSON"));
        assert!(declares_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/merge-patch+json"));
        assert!(!declares_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!declares_json(&headers));
    }

    #[test]
    fn strict_top_level() {
        assert!(check_json(b"").is_ok());
        assert!(check_json(b"  \n").is_err());
        assert!(check_json(br#"{"a": 1}"#).is_ok());
        assert!(check_json(b"[1, 2]").is_ok());
        assert!(check_json(b"\"string\"").is_err());
        assert!(check_json(b"42").is_err());
        assert!(check_json(b"{\"a\": ").is_err());
    }

    #[tokio::test]
    async fn malformed_body_never_reaches_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits.clone(), 1024)
            .oneshot(json_request("{\"email\": \"a@b.c\","))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_body_is_passed_through_unchanged() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits.clone(), 1024)
            .oneshot(json_request(r#"{"email": "a@b.c"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"email": "a@b.c"}"#);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits.clone(), 8)
            .oneshot(json_request(r#"{"email": "a@b.c"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_only_body_is_400() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = app(hits.clone(), 1024)
            .oneshot(json_request("   "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn only_the_length_limit_maps_to_413() {
        let limit_err = to_bytes(Body::from("0123456789"), 4).await.unwrap_err();
        assert!(matches!(
            body_error(limit_err, 4),
            ApiError::PayloadTooLarge { limit: 4 }
        ));

        let reset = axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        let err = body_error(reset, 4);
        assert!(matches!(err, ApiError::BodyRead(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_json_bodies_are_untouched() {
        let hits = Arc::new(AtomicUsize::new(0));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(hits.clone(), 1024).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
