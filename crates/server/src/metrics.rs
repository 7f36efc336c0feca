//! Prometheus recorder and `/metrics` handler

use axum::http::header;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub use lipi_pipeline::metrics::{record_request, REQUESTS_TOTAL};

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder
///
/// Returns `None` if another recorder is already installed. Calling it
/// again after a successful install returns the same handle.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle.clone());
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = HANDLE.set(handle.clone());
            tracing::info!("Prometheus metrics recorder installed");
            Some(handle)
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install metrics recorder");
            None
        },
    }
}

/// Render the Prometheus text exposition; empty when no recorder is installed
pub async fn metrics_handler() -> impl IntoResponse {
    let body = HANDLE.get().map(|h| h.render()).unwrap_or_default();
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
