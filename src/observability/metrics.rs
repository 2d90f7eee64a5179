//! Metrics collection and exposition.
//!
//! # Metrics
//! - `assemble_dispatch_total` (counter): dispatches by outcome, method
//! - `assemble_dispatch_duration_seconds` (histogram): handler latency
//!
//! `outcome` is one of `matched`, `not_found` or `unresolved`. `method` is a
//! known verb or `OTHER`, so client-chosen methods cannot add series.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Verb;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(outcome: &'static str, method: &str, start: Instant) {
    let method = method_label(method);
    metrics::counter!("assemble_dispatch_total", "outcome" => outcome, "method" => method).increment(1);
    metrics::histogram!("assemble_dispatch_duration_seconds", "outcome" => outcome, "method" => method)
        .record(start.elapsed().as_secs_f64());
}

fn method_label(method: &str) -> &'static str {
    match method.parse::<Verb>() {
        Ok(Verb::Any) | Ok(Verb::NotFound) | Err(_) => "OTHER",
        Ok(verb) => verb.as_str(),
    }
}
