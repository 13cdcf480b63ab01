//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Build the route table and the page application
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners bind last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError};
use crate::http::HttpServer;
use crate::observability::{logging, metrics};
use crate::render::DebugApp;
use crate::routing::DeclarationError;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Routes(#[from] DeclarationError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load `config_path`, initialize observability and bind the listener.
///
/// `bind_override` replaces the configured bind address.
pub async fn startup(
    config_path: &Path,
    bind_override: Option<String>,
) -> Result<(HttpServer, TcpListener), StartupError> {
    let mut config = load_config(config_path)?;
    if let Some(address) = bind_override {
        config.listener.bind_address = address;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        config = %config_path.display(),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let app = match &config.dispatch.static_dir {
        Some(dir) => DebugApp::new().with_static_dir(dir),
        None => DebugApp::new(),
    };

    let address = config.listener.bind_address.clone();
    let server = HttpServer::from_config(config, app)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((server, listener))
}
