use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gateway_jwt_extension::{
    config::AppConfig,
    extension::{start_extension_server, GatewayExtension, OidcDiscoveryClient},
    observability::{init_logging, log_config_info},
    APP_NAME, VERSION,
};
use tokio::signal;
use tracing::{error, info};

/// Envoy Gateway extension server for JWTProvider resources
#[derive(Parser, Debug)]
#[command(name = "gateway-jwt-extension")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Path to a YAML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds to wait after the server stops before exiting
    #[arg(long = "graceful-shutdown", value_name = "SECONDS")]
    graceful_shutdown: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(seconds) = args.graceful_shutdown {
        config.shutdown.grace_period_seconds = seconds;
    }

    init_logging(&config.observability).context("Failed to initialise logging")?;
    info!(app_name = APP_NAME, version = VERSION, "Starting gateway JWT extension");
    log_config_info(&config);

    let discovery =
        Arc::new(OidcDiscoveryClient::new(&config.discovery).context("Failed to create discovery client")?);
    let extension = GatewayExtension::new(config.features.clone(), discovery);

    if let Err(e) = start_extension_server(&config.listener, extension, shutdown_signal()).await {
        error!(error = %e, "Extension server terminated with error");
        return Err(e.into());
    }

    let grace = config.shutdown.grace_period();
    info!(grace_period_seconds = grace.as_secs(), "Extension server stopped; waiting for grace period");
    tokio::time::sleep(grace).await;

    info!("Gateway JWT extension shutdown completed");
    Ok(())
}

/// Resolves on ctrl-c or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c; shutting down"),
        _ = terminate => info!("Received SIGTERM; shutting down"),
    }
}
