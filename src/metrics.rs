//! Metrics for the Funko API, following Prometheus naming conventions.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;

use crate::error::{FunkoApiError, Result};

/// Metric names used across the system. The enum keeps names out of call
/// sites so a typo is a compile error rather than a new time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    HttpRequests,
    FunkosCreated,
    FunkosUpdated,
    FunkosPatched,
    FunkosDeleted,
    CacheHits,
    CacheMisses,
    ValidationFailures,
    RequestDuration,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricName::HttpRequests => "funko_api_http_requests_total",
            MetricName::FunkosCreated => "funko_api_funkos_created_total",
            MetricName::FunkosUpdated => "funko_api_funkos_updated_total",
            MetricName::FunkosPatched => "funko_api_funkos_patched_total",
            MetricName::FunkosDeleted => "funko_api_funkos_deleted_total",
            MetricName::CacheHits => "funko_api_cache_hits_total",
            MetricName::CacheMisses => "funko_api_cache_misses_total",
            MetricName::ValidationFailures => "funko_api_validation_failures_total",
            MetricName::RequestDuration => "funko_api_request_duration_seconds",
        };
        write!(f, "{}", name)
    }
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| FunkoApiError::Metrics(format!("failed to install recorder: {e}")))
}

pub fn http_request(method: &str, status: u16) {
    counter!(
        MetricName::HttpRequests.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn funko_created() {
    counter!(MetricName::FunkosCreated.to_string()).increment(1);
}

pub fn funko_updated() {
    counter!(MetricName::FunkosUpdated.to_string()).increment(1);
}

pub fn funko_patched() {
    counter!(MetricName::FunkosPatched.to_string()).increment(1);
}

pub fn funko_deleted() {
    counter!(MetricName::FunkosDeleted.to_string()).increment(1);
}

pub fn cache_hit() {
    counter!(MetricName::CacheHits.to_string()).increment(1);
}

pub fn cache_miss() {
    counter!(MetricName::CacheMisses.to_string()).increment(1);
}

pub fn validation_failed() {
    counter!(MetricName::ValidationFailures.to_string()).increment(1);
}

pub fn request_duration(seconds: f64) {
    histogram!(MetricName::RequestDuration.to_string()).record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_follow_prometheus_conventions() {
        assert_eq!(
            MetricName::HttpRequests.to_string(),
            "funko_api_http_requests_total"
        );
        assert_eq!(
            MetricName::CacheMisses.to_string(),
            "funko_api_cache_misses_total"
        );
    }
}
