//! Spec harness dispatch server.
//!
//! Resolves every request against the harness route table and answers with
//! the controller/action (or mounted application) it dispatches to.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!     ───────────────────▶│  request id  │───▶│  http server │───▶│ route table  │
//!                         │   + trace    │    │  (axum)      │    │ (first match)│
//!                         └──────────────┘    └──────────────┘    └──────┬───────┘
//!                                                                        │
//!     Client Response     ┌──────────────┐                               │
//!     ◀───────────────────│ dispatch JSON│◀──────────────────────────────┘
//!                         │   or 404     │
//!                         └──────────────┘
//!
//!     Cross-cutting: config (TOML) · observability (tracing, metrics) · lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use spec_harness_router::config::load_or_default;
use spec_harness_router::lifecycle::{signals, startup, Shutdown};
use spec_harness_router::observability::logging;

#[derive(Parser)]
#[command(name = "spec-harness")]
#[command(about = "Dispatch server for the spec harness route table", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_or_default(args.config.as_deref())?;
    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "spec-harness starting");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::forward_os_signals(shutdown.clone()));

    startup::start(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
