//! university-connect backend library.
//!
//! Everything the binary wires together is public so integration tests and
//! business route crates can build the same server in-process.

pub mod certificates;
pub mod config;
pub mod database;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use http::{ApiError, AppContext, HttpServer};
pub use lifecycle::{Application, Shutdown, StartupError};
pub use routing::{MountTable, RouteGroup};
