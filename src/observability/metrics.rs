//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_dispatch_total` (counter): template handler invocations by handler and
//!   outcome (render, redirect, error)
//! - `site_redirect_total` (counter): redirects issued
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus exporter.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::StartupError;

/// Result of one template handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Render,
    Redirect,
    Error,
}

impl DispatchOutcome {
    fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::Render => "render",
            DispatchOutcome::Redirect => "redirect",
            DispatchOutcome::Error => "error",
        }
    }
}

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), StartupError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| StartupError::Metrics(e.to_string()))?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_dispatch(handler: &'static str, outcome: DispatchOutcome) {
    counter!("site_dispatch_total", "handler" => handler, "outcome" => outcome.as_str())
        .increment(1);
}

pub fn record_redirect() {
    counter!("site_redirect_total").increment(1);
}
