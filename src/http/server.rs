//! HTTP server for one site.
//!
//! # Responsibilities
//! - Hold the state shared with every handler
//! - Bind the site's listener
//! - Serve the site router until shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::check_port;
use crate::error::StartupError;
use crate::services::Services;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
}

impl AppState {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

/// Fully-built site ready to accept traffic.
pub struct SiteServer {
    name: String,
    address: String,
    router: Router,
}

impl SiteServer {
    /// Server for `router` listening on all interfaces at `port`.
    pub fn new(name: impl Into<String>, port: &str, router: Router) -> Self {
        Self {
            name: name.into(),
            address: format!("0.0.0.0{}", check_port(port)),
            router,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        TcpListener::bind(&self.address)
            .await
            .map_err(|source| StartupError::Bind {
                address: self.address.clone(),
                source,
            })
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr().map_err(StartupError::Serve)?;
        tracing::info!(site = %self.name, address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(StartupError::Serve)?;

        tracing::info!(site = %self.name, "HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_port() {
        let server = SiteServer::new("main", "8080", Router::new());
        assert_eq!(server.address(), "0.0.0.0:8080");
        let server = SiteServer::new("admin", ":9000", Router::new());
        assert_eq!(server.address(), "0.0.0.0:9000");
        assert_eq!(server.name(), "admin");
    }
}
