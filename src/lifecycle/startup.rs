//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every configured site
//! - Bind all listeners before serving any traffic
//! - Serve the sites concurrently, stopping all of them when one fails
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is served
//! - Listeners start last (traffic only when every site is ready)

use tokio::task::JoinSet;

use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::http::server::SiteServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::site::build_default_site;

/// One server per configured site, each with the default collaborators.
pub fn build_servers(config: &ServerConfig) -> Result<Vec<SiteServer>, StartupError> {
    config
        .sites
        .iter()
        .map(|site_config| build_default_site(config, site_config)?.into_server(&config.timeouts))
        .collect()
}

/// Serve every site until `shutdown` triggers or one of them fails.
///
/// The first failure triggers the shutdown of the others and is returned once
/// they have all stopped.
pub async fn run_sites(servers: Vec<SiteServer>, shutdown: Shutdown) -> Result<(), StartupError> {
    let mut bound = Vec::with_capacity(servers.len());
    for server in servers {
        let listener = server.bind().await?;
        bound.push((server, listener));
    }

    let mut tasks = JoinSet::new();
    for (server, listener) in bound {
        tasks.spawn(server.run(listener, shutdown.signalled()));
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap_or_else(|e| Err(StartupError::Serve(std::io::Error::other(e))));
        if let Err(e) = result {
            tracing::error!(error = %e, "Site failed, stopping all sites");
            shutdown.trigger();
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
