//! Configuration validation.
//!
//! Serde handles syntax; this module checks meaning. Every problem is
//! reported, not just the first, so a bad deployment can be fixed in one go.

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};

use crate::config::schema::{AppConfig, CorsConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let uri = config.database.uri.trim();
    if uri.is_empty() {
        errors.push(ValidationError::new("database.uri", "must be set (MONGODB_URI)"));
    } else if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
        errors.push(ValidationError::new(
            "database.uri",
            "must start with mongodb:// or mongodb+srv://",
        ));
    }

    if config.database.default_database.is_empty() {
        errors.push(ValidationError::new("database.default_database", "must not be empty"));
    }

    if config.server.json_body_limit == 0 {
        errors.push(ValidationError::new("server.json_body_limit", "must be greater than 0"));
    }

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::new("server.host", "must not be empty"));
    }

    errors.extend(validate_cors(&config.cors));

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_cors(cors: &CorsConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if cors.allowed_origins.is_empty() {
        errors.push(ValidationError::new("cors.allowed_origins", "must list at least one origin"));
    }

    for origin in &cors.allowed_origins {
        if origin == "*" {
            if cors.allow_credentials {
                errors.push(ValidationError::new(
                    "cors.allowed_origins",
                    "wildcard origin cannot be combined with credentials",
                ));
            }
            continue;
        }
        if !(origin.starts_with("http://") || origin.starts_with("https://"))
            || origin.ends_with('/')
            || HeaderValue::from_str(origin).is_err()
        {
            errors.push(ValidationError::new(
                "cors.allowed_origins",
                format!("`{}` is not a valid origin", origin),
            ));
        }
    }

    for method in &cors.allowed_methods {
        if method == "*" && cors.allow_credentials {
            errors.push(ValidationError::new(
                "cors.allowed_methods",
                "wildcard method cannot be combined with credentials",
            ));
        } else if method != "*" && Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_methods",
                format!("`{}` is not a valid method", method),
            ));
        }
    }

    for header in &cors.allowed_headers {
        if header == "*" && cors.allow_credentials {
            errors.push(ValidationError::new(
                "cors.allowed_headers",
                "wildcard header cannot be combined with credentials",
            ));
        } else if header != "*" && HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_headers",
                format!("`{}` is not a valid header name", header),
            ));
        }
    }

    errors
}
