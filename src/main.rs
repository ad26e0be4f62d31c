//! Task API server binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                  TASK API                      │
//!                    │                                                │
//!   Client Request   │  ┌────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│ routing  │──▶│    tasks    │  │
//!                    │  │ server │   │  table   │   │  handlers   │  │
//!                    │  └────┬───┘   └──────────┘   └──────┬──────┘  │
//!                    │       │                             │         │
//!                    │       │ POST /tasks/import-csv      ▼         │
//!                    │       ▼                      ┌─────────────┐  │
//!                    │  ┌────────┐                  │    store    │  │
//!                    │  │ import │─────────────────▶│ (JSON file) │  │
//!                    │  │  csv   │                  └─────────────┘  │
//!                    │  └────────┘                                   │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use tasks_api::config::{load_config, ServerConfig};
use tasks_api::http::HttpServer;
use tasks_api::lifecycle::{signals, Shutdown};
use tasks_api::observability::logging;
use tasks_api::store::Datastore;

#[derive(Debug, Parser)]
#[command(name = "tasks-api", about = "File-backed task CRUD API")]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage_path = %config.storage.path.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    let store = Arc::new(Datastore::open(&config.storage.path).await?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::listen(shutdown.clone()));

    let server = HttpServer::new(config, store)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
