use std::time::Duration;

use error_stack::ResultExt;
use lazy_static::lazy_static;
use prometheus::{self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, TextEncoder};

// Define latency buckets for histograms
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const API_CALL_LABELS: &[&str] = &["flow", "connector"];

pub struct ExternalServiceMetrics {
    pub total_api_calls: IntCounterVec,
    pub api_calls_latency: HistogramVec,
    pub api_calls_errors: IntCounterVec,
}

impl ExternalServiceMetrics {
    fn register(registry: &prometheus::Registry) -> prometheus::Result<Self> {
        let total_api_calls = IntCounterVec::new(
            Opts::new(
                "EXTERNAL_SERVICE_TOTAL_API_CALLS",
                "Total number of external service API calls",
            ),
            API_CALL_LABELS,
        )?;
        let api_calls_latency = HistogramVec::new(
            HistogramOpts::new(
                "EXTERNAL_SERVICE_API_CALLS_LATENCY_SECONDS",
                "Latency of external service API calls",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            API_CALL_LABELS,
        )?;
        let api_calls_errors = IntCounterVec::new(
            Opts::new(
                "EXTERNAL_SERVICE_API_CALLS_ERRORS",
                "Total number of errors in external service API calls",
            ),
            &["flow", "connector", "error"],
        )?;

        registry.register(Box::new(total_api_calls.clone()))?;
        registry.register(Box::new(api_calls_latency.clone()))?;
        registry.register(Box::new(api_calls_errors.clone()))?;

        Ok(Self {
            total_api_calls,
            api_calls_latency,
            api_calls_errors,
        })
    }
}

lazy_static! {
    // Metrics are skipped, not fatal, when registration fails.
    static ref METRICS: Option<ExternalServiceMetrics> =
        ExternalServiceMetrics::register(prometheus::default_registry())
            .inspect_err(|error| {
                tracing::error!(?error, "failed to register external service metrics")
            })
            .ok();
}

pub fn record_api_call(flow: &str, connector: &str) {
    if let Some(metrics) = METRICS.as_ref() {
        metrics
            .total_api_calls
            .with_label_values(&[flow, connector])
            .inc();
    }
}

pub fn record_api_latency(flow: &str, connector: &str, latency: Duration) {
    if let Some(metrics) = METRICS.as_ref() {
        metrics
            .api_calls_latency
            .with_label_values(&[flow, connector])
            .observe(latency.as_secs_f64());
    }
}

pub fn record_api_error(flow: &str, connector: &str, error: &str) {
    if let Some(metrics) = METRICS.as_ref() {
        metrics
            .api_calls_errors
            .with_label_values(&[flow, connector, error])
            .inc();
    }
}

// Metrics handler
pub fn metrics_handler() -> error_stack::Result<String, MetricsError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .change_context(MetricsError::EncodingError)?;
    String::from_utf8(buffer).change_context(MetricsError::Utf8Error)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Error encoding metrics")]
    EncodingError,
    #[error("Error converting metrics to utf8")]
    Utf8Error,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn recorded_calls_show_up_in_the_export() {
        record_api_call("authorize", "vindicia");
        record_api_latency("authorize", "vindicia", Duration::from_millis(120));
        record_api_error("capture", "vindicia", "request_timeout_received");

        let exported = metrics_handler().unwrap();
        assert!(exported.contains("EXTERNAL_SERVICE_TOTAL_API_CALLS"));
        assert!(exported.contains("EXTERNAL_SERVICE_API_CALLS_LATENCY_SECONDS"));
        assert!(exported.contains("request_timeout_received"));
    }
}
