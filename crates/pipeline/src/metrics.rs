//! Metric names and recording helpers
//!
//! Recording is a no-op until the binary installs a recorder.

use std::time::Duration;

/// Requests handled (counter, labels: endpoint, status)
pub const REQUESTS_TOTAL: &str = "lipi_requests_total";
/// Stage degradations (counter, labels: stage)
pub const STAGE_DEGRADED_TOTAL: &str = "lipi_stage_degraded_total";
/// Stage latency (histogram, labels: stage)
pub const STAGE_LATENCY_SECONDS: &str = "lipi_stage_latency_seconds";

pub const STAGE_OCR: &str = "ocr";
pub const STAGE_TRANSLITERATION: &str = "transliteration";
pub const STAGE_TTS: &str = "tts";

pub fn record_stage_latency(stage: &'static str, elapsed: Duration) {
    metrics::histogram!(STAGE_LATENCY_SECONDS, "stage" => stage).record(elapsed.as_secs_f64());
}

pub fn record_degraded(stage: &'static str) {
    metrics::counter!(STAGE_DEGRADED_TOTAL, "stage" => stage).increment(1);
}

pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint, "status" => status.to_string())
        .increment(1);
}
