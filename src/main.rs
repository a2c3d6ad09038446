//! appconfig-demo entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use appconfig_demo::infrastructure::logging::LoggerImpl;
use appconfig_demo::{Application, ConfigLoader};

#[derive(Parser, Debug)]
#[command(name = "appconfig-demo")]
#[command(about = "Serve remotely refreshed configuration and feature flags over HTTP")]
struct Args {
    /// Service config file (defaults to ./appconfig-demo.yaml when present)
    #[arg(short, long, env = "APPCONFIG_DEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to, overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides server.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        service = %config.service_name,
        provider = ?config.provider.kind,
        feature = %config.feature.name,
        "starting"
    );

    let app = Application::build(&config).await?;
    app.run(shutdown_signal()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
