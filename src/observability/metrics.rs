//! Metrics collection and exposition.
//!
//! # Metrics
//! - `navigator_resolutions_total` (counter): resolutions by result
//! - `navigator_resolve_duration_seconds` (histogram): time spent resolving
//! - `navigator_redirects_total` (counter): redirect hops followed
//! - `navigator_deferred_loads_total` (counter): deferred view loads by view, result
//! - `navigator_cached_views` (gauge): deferred views currently cached
//! - `navigator_navigations_total` (counter): navigations by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus recorder is installed by the binary, never by the library

use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder as the global metrics recorder.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

pub fn record_resolution(elapsed: Duration, matched: bool) {
    let result = if matched { "matched" } else { "failed" };
    ::metrics::counter!("navigator_resolutions_total", "result" => result).increment(1);
    ::metrics::histogram!("navigator_resolve_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_redirects(hops: usize) {
    if hops > 0 {
        ::metrics::counter!("navigator_redirects_total").increment(hops as u64);
    }
}

pub fn record_deferred_load(view: &str, loaded: bool) {
    let result = if loaded { "loaded" } else { "failed" };
    ::metrics::counter!(
        "navigator_deferred_loads_total",
        "view" => view.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_cached_views(count: usize) {
    ::metrics::gauge!("navigator_cached_views").set(count as f64);
}

pub fn record_navigation(outcome: &'static str) {
    ::metrics::counter!("navigator_navigations_total", "outcome" => outcome).increment(1);
}
