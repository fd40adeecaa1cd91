//! university-connect backend server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request id ─▶ trace ─▶ metrics ─▶ catch panic ─▶ CORS ─▶ JSON body
//!                                                                          │
//!                  ┌───────────────────────────────────────────────────────┤
//!                  ▼                          ▼                            ▼
//!         /api/<group>/* (7 groups)   /certificates/* (ServeDir)      404 fallback
//!                  │
//!                  ▼
//!           AppContext { config, MongoDB database }
//! ```
//!
//! Startup order: config → logging → certificates dir → MongoDB → bind → serve.
//! A database that cannot be reached exits with status 1 before binding.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use university_connect::config::loader::{load_config, load_dotenv};
use university_connect::lifecycle::signals::shutdown_signal;
use university_connect::observability::{logging, metrics};
use university_connect::{Application, MountTable, Shutdown};

#[derive(Parser)]
#[command(name = "university-connect", version)]
#[command(about = "Backend server for university-connect", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// dotenv file to load. Defaults to `.env` when present.
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_file = match load_dotenv(cli.env_file.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to load env file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        env_file = ?env_file,
        config_file = ?cli.config,
        "university-connect starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = match Application::bootstrap(config, MountTable::standard()).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.trigger();
        }
    });

    match app.run(server_shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
