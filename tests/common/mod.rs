//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::Response;
use university_connect::config::{AppConfig, Secret};
use university_connect::database::connector::handle;
use university_connect::lifecycle::Shutdown;
use university_connect::{AppContext, HttpServer, MountTable};

/// A MongoDB URI nothing listens on. The driver connects lazily, so
/// handles built from it work until a query is issued.
pub const UNREACHABLE_MONGO: &str = "mongodb://127.0.0.1:1/university-connect-test";

/// Valid configuration pointing at `certificates_dir`, bound to an ephemeral port.
pub fn test_config(certificates_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.json_body_limit = 1024;
    config.database.uri = UNREACHABLE_MONGO.to_string();
    config.database.server_selection_timeout_ms = 200;
    config.auth.jwt_secret = Secret::new("test-secret");
    config.storage.certificates_dir = certificates_dir.to_path_buf();
    config
}

/// Build a server without running the startup sequence.
pub async fn build_server(config: AppConfig, mounts: MountTable) -> HttpServer {
    let db = handle(&config.database).await.unwrap();
    HttpServer::new(AppContext::new(config, db), mounts).unwrap()
}

/// Serve on an ephemeral port; the server stops when `shutdown` triggers.
#[allow(dead_code)]
pub async fn spawn_server(server: HttpServer, shutdown: &Shutdown) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let receiver = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    addr
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
