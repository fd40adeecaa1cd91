//! One-shot MongoDB connector.

use std::fmt;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::config::DatabaseConfig;

const APP_NAME: &str = "university-connect";

/// Connection lifecycle. `Connected` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("invalid connection options: {0}")]
    Options(#[source] mongodb::error::Error),

    #[error("database unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),

    #[error("connection already attempted (state: {0})")]
    AlreadyAttempted(ConnectionState),
}

/// Drives the single startup connection attempt.
pub struct DatabaseConnector {
    config: DatabaseConfig,
    state: ConnectionState,
}

impl DatabaseConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connect and ping. May only be called once.
    pub async fn connect(&mut self) -> Result<Database, DatabaseError> {
        if self.state != ConnectionState::Disconnected {
            return Err(DatabaseError::AlreadyAttempted(self.state));
        }

        self.transition(ConnectionState::Connecting);

        match self.try_connect().await {
            Ok(db) => {
                self.transition(ConnectionState::Connected);
                tracing::info!(database = %db.name(), "MongoDB connected");
                Ok(db)
            }
            Err(e) => {
                self.transition(ConnectionState::Failed);
                tracing::error!(error = %e, "MongoDB connection error");
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<Database, DatabaseError> {
        let db = handle(&self.config).await?;
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(DatabaseError::Unreachable)?;
        Ok(db)
    }

    fn transition(&mut self, next: ConnectionState) {
        tracing::debug!(from = %self.state, to = %next, "Database state change");
        self.state = next;
    }
}

/// Build a database handle without touching the network.
///
/// The driver connects lazily, so this only fails on a malformed URI.
pub async fn handle(config: &DatabaseConfig) -> Result<Database, DatabaseError> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(DatabaseError::Options)?;
    options.app_name = Some(APP_NAME.to_string());
    options.server_selection_timeout =
        Some(Duration::from_millis(config.server_selection_timeout_ms));

    let client = Client::with_options(options).map_err(DatabaseError::Options)?;
    Ok(client
        .default_database()
        .unwrap_or_else(|| client.database(&config.default_database)))
}
