//! Customer Service REST API
//!
//! CRUD service for customer records backed by PostgreSQL.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                 CUSTOMER SERVICE                  │
//!                    │                                                   │
//!   Client Request   │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!   ─────────────────┼─▶│  http   │───▶│ handlers │───▶│   domain    │  │
//!                    │  │ server  │    │          │    │ validation  │  │
//!                    │  └─────────┘    └────┬─────┘    └─────────────┘  │
//!                    │                      │                           │
//!                    │                      ▼                           │
//!   Client Response  │  ┌─────────┐    ┌──────────┐                     │
//!   ◀────────────────┼──│  error  │◀───│  store   │◀────────────────────┼──── PostgreSQL
//!                    │  │ mapping │    │ (trait)  │                     │
//!                    │  └─────────┘    └──────────┘                     │
//!                    │                                                   │
//!                    │  config · observability · resilience · lifecycle │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use customer_service::config;
use customer_service::lifecycle::startup;
use customer_service::observability::logging;

#[derive(Parser)]
#[command(name = "customer-service")]
#[command(about = "REST API for managing customer records", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "CUSTOMER_SERVICE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = config::load(args.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "customer-service starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.database.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
