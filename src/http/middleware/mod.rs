//! Request middleware applied ahead of route dispatch.

pub mod cors;
pub mod json_body;

pub use cors::{build_cors_layer, CorsError};
pub use json_body::{json_body_middleware, JsonBodyLimit};
