//! Prometheus recorder shared by every service in the process.

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Bucket bounds for every `*_seconds` histogram. Model calls can take minutes.
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
];

static METRICS_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the global Prometheus recorder.
///
/// Safe to call more than once: only the first call installs, later calls get
/// the same handle. Returns `None` when the recorder could not be installed
/// (for instance another recorder already owns the global slot); metrics are
/// then silently dropped.
pub fn init_metrics() -> Option<PrometheusHandle> {
    METRICS_HANDLE
        .get_or_init(|| {
            let installed = PrometheusBuilder::new()
                .set_buckets_for_metric(Matcher::Suffix("_seconds".to_string()), LATENCY_BUCKETS)
                .and_then(|builder| builder.install_recorder());

            match installed {
                Ok(handle) => {
                    tracing::info!("Prometheus metrics initialized");
                    Some(handle)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install Prometheus recorder");
                    None
                }
            }
        })
        .clone()
}

/// Current metrics in Prometheus text format, for the `/metrics` endpoint.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .and_then(|handle| handle.as_ref())
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}
