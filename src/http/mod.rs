//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, request id, tracing span)
//!     → metrics, panic catcher
//!     → middleware/cors.rs (preflight answered here)
//!     → middleware/json_body.rs (malformed JSON rejected here)
//!     → routing (route group | /certificates | 404)
//!     → error.rs (uniform JSON errors)
//! ```

pub mod error;
pub mod middleware;
pub mod server;

pub use error::ApiError;
pub use server::{AppContext, HttpServer, ServerError};
