//! Startup orchestration.
//!
//! # Responsibilities
//! - Prepare the certificate directory
//! - Connect to the database (one attempt)
//! - Build the HTTP server and bind its listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and reported as `StartupError`
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last (traffic only when ready)

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::certificates;
use crate::config::AppConfig;
use crate::database::{DatabaseConnector, DatabaseError};
use crate::http::{AppContext, HttpServer, ServerError};
use crate::routing::MountTable;

/// Why the service refused to start.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("cannot prepare certificates directory {}: {source}", .path.display())]
    Certificates {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// A started service: database connected, listener bound, not yet serving.
pub struct Application {
    server: HttpServer,
    listener: TcpListener,
}

impl Application {
    /// Run the startup sequence.
    pub async fn bootstrap(config: AppConfig, mounts: MountTable) -> Result<Self, StartupError> {
        tracing::info!(
            port = config.server.port,
            certificates_dir = %config.storage.certificates_dir.display(),
            origins = ?config.cors.allowed_origins,
            jwt_secret_set = !config.auth.jwt_secret.is_empty(),
            jwt_secret_len = config.auth.jwt_secret.len(),
            "Configuration loaded"
        );
        if config.auth.jwt_secret.is_empty() {
            tracing::warn!("JWT_SECRET is not set; token signing in the auth routes will fail");
        }

        let dir = &config.storage.certificates_dir;
        certificates::ensure_dir(dir).map_err(|source| StartupError::Certificates {
            path: dir.clone(),
            source,
        })?;
        tracing::info!(
            path = %dir.display(),
            "Certificates are served publicly under /certificates without access control"
        );

        let mut connector = DatabaseConnector::new(config.database.clone());
        let db = connector.connect().await?;

        let address = config.server.bind_address();
        let server = HttpServer::new(AppContext::new(config, db), mounts)?;

        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address, source })?;

        Ok(Self { server, listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the shutdown receiver fires (see [`crate::lifecycle::Shutdown::subscribe`]).
    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        self.server.run(self.listener, shutdown).await
    }
}
