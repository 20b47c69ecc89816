//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reconciler_passes_total` (counter): synchronization passes run
//! - `reconciler_actions_total` (counter): pass outcomes by action
//! - `reconciler_handler_errors_total` (counter): handler failures by annotation

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_pass(action: &'static str) {
    ::metrics::counter!("reconciler_passes_total").increment(1);
    ::metrics::counter!("reconciler_actions_total", "action" => action).increment(1);
}

pub fn record_handler_error(annotation: &str) {
    ::metrics::counter!("reconciler_handler_errors_total", "annotation" => annotation.to_string())
        .increment(1);
}
