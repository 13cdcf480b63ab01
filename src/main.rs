//! Route-driven page server.
//!
//! Serves a page application behind a declarative route table.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ dispatcher ──▶ skip rule? ──yes──▶ app.handle
//!                     (request id,     │
//!                      timeout,        ▼
//!                      trace)       decode path ──malformed──▶ 400
//!                                      │
//!                                      ▼
//!                                  route table ──no match──▶ app.handle
//!                                      │
//!                                      ▼
//!                                  app.render(page, params)
//! ```

use std::path::PathBuf;

use clap::Parser;

use minimal_routes::lifecycle::{startup, wait_for_signal, Shutdown};

#[derive(Parser)]
#[command(name = "minimal-routes")]
#[command(about = "Serve pages from a declarative route table", long_about = None)]
struct Cli {
    /// Path to the TOML config holding listener settings and routes.
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (server, listener) = startup(&cli.config, cli.bind).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
