use std::path::PathBuf;

use clap::Parser;

use site_engine::config::loader::load_config;
use site_engine::lifecycle::{build_servers, run_sites, signals, Shutdown};
use site_engine::observability::{logging, metrics};

/// Serve the sites described by a configuration file.
#[derive(Debug, Parser)]
#[command(name = "site-engine", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability);
    tracing::info!(
        config = ?cli.config,
        sites = config.sites.len(),
        default_lang = %config.locales.default_lang,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let servers = build_servers(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to build sites");
    })?;

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    run_sites(servers, shutdown).await.inspect_err(|e| {
        tracing::error!(error = %e, "Server stopped on error");
    })?;

    tracing::info!("Shutdown complete");
    Ok(())
}
