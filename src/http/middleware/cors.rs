//! CORS policy.
//!
//! One `CorsConfig` becomes one `CorsLayer`. Preflight requests are answered
//! by the layer and never reach a route group.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

#[derive(Debug, thiserror::Error)]
pub enum CorsError {
    #[error("invalid origin `{0}`")]
    Origin(String),

    #[error("invalid method `{0}`")]
    Method(String),

    #[error("invalid header `{0}`")]
    Header(String),

    #[error("wildcards cannot be combined with credentials")]
    WildcardWithCredentials,
}

/// Build the layer. Wildcards (`*`) are only accepted without credentials;
/// `tower_http` would otherwise panic on the first request.
pub fn build_cors_layer(config: &CorsConfig) -> Result<CorsLayer, CorsError> {
    let is_wild = |items: &[String]| items.iter().any(|i| i == "*");
    if config.allow_credentials
        && (is_wild(&config.allowed_origins)
            || is_wild(&config.allowed_methods)
            || is_wild(&config.allowed_headers))
    {
        return Err(CorsError::WildcardWithCredentials);
    }

    let origins = if is_wild(&config.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        let list = config
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).map_err(|_| CorsError::Origin(o.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(list)
    };

    let methods = if is_wild(&config.allowed_methods) {
        AllowMethods::from(Any)
    } else {
        let list = config
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .map_err(|_| CorsError::Method(m.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowMethods::list(list)
    };

    let headers = if is_wild(&config.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        let list = config
            .allowed_headers
            .iter()
            .map(|h| HeaderName::from_bytes(h.as_bytes()).map_err(|_| CorsError::Header(h.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        AllowHeaders::list(list)
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials))
}
