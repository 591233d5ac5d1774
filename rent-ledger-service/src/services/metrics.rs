//! Metrics collection and Prometheus export.
//!
//! Installs the Prometheus recorder and exposes the ledger's own counters.

use crate::models::StatusTier;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Must run before any metric is recorded. Later calls are no-ops.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .expect("failed to install Prometheus recorder")
    });
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Count a successful write (`insert`, `update`, `delete`).
pub fn record_write(operation: &'static str) {
    counter!("ledger_records_written_total", "operation" => operation).increment(1);
}

/// Publish how many records of the last served month sit in each tier.
pub fn record_status_tiers(counts: &BTreeMap<StatusTier, usize>) {
    for (tier, count) in counts {
        gauge!("ledger_records_by_status", "tier" => tier.label()).set(*count as f64);
    }
}
