//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with every mount
//! - Wire up middleware (request id, tracing, metrics, panics, CORS, JSON)
//! - Serve certificates as static files
//! - Serve on a listener until shutdown

use std::io;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::from_fn_with_state;
use axum::Router;
use mongodb::Database;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::certificates::{self, CERTIFICATES_PREFIX};
use crate::config::AppConfig;
use crate::http::error::{handle_panic, not_found};
use crate::http::middleware::{build_cors_layer, json_body_middleware, CorsError, JsonBodyLimit};
use crate::observability::metrics::track_requests;
use crate::routing::MountTable;

/// Application state injected into route groups.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Database,
}

impl AppContext {
    pub fn new(config: AppConfig, db: Database) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("CORS policy: {0}")]
    Cors(#[from] CorsError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// HTTP server for the backend.
pub struct HttpServer {
    router: Router,
    context: AppContext,
}

impl HttpServer {
    /// Create a new HTTP server over the given mounts.
    pub fn new(context: AppContext, mounts: MountTable) -> Result<Self, ServerError> {
        let router = Self::build_router(&context, mounts)?;
        Ok(Self { router, context })
    }

    /// Build the axum router with all middleware layers.
    ///
    /// Layers are listed innermost first; a request passes them bottom-up:
    /// request id → trace → metrics → CORS → panic catcher → JSON body → route.
    fn build_router(context: &AppContext, mounts: MountTable) -> Result<Router, CorsError> {
        let config = &context.config;
        let cors = build_cors_layer(&config.cors)?;
        let index = Arc::new(mounts.index());

        let router = mounts
            .into_router()
            .nest_service(
                CERTIFICATES_PREFIX,
                certificates::service(&config.storage.certificates_dir),
            )
            .fallback(not_found)
            .with_state(context.clone())
            .layer(from_fn_with_state(
                JsonBodyLimit(config.server.json_body_limit),
                json_body_middleware,
            ))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(cors)
            .layer(from_fn_with_state(index, track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Ok(router)
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Server running");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
