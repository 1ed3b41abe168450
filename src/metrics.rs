//! Upstream call metrics
//!
//! Tracks latency percentiles and success rate of the calls a provider makes.

use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples kept for percentile calculation
const MAX_SAMPLES: usize = 100;

/// Snapshot of the metrics of one provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderMetrics {
    /// Name of the provider
    pub provider_name: String,
    /// 50th percentile latency of successful calls, in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful calls, in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of calls recorded
    pub total_requests: u64,
    /// Number of failed calls
    pub failed_requests: u64,
}

impl ProviderMetrics {
    /// Metrics of a provider that has not been called yet
    pub fn empty(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
        }
    }
}

#[derive(Debug, Default)]
struct MetricsState {
    /// Latencies of the last successful calls
    latencies_ms: VecDeque<f64>,
    total_requests: u64,
    failed_requests: u64,
}

/// Collects call outcomes for one provider
pub struct MetricsCollector {
    provider_name: String,
    state: RwLock<MetricsState>,
}

impl MetricsCollector {
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            state: RwLock::new(MetricsState {
                latencies_ms: VecDeque::with_capacity(MAX_SAMPLES),
                ..MetricsState::default()
            }),
        }
    }

    /// Records one call with its duration and outcome
    pub async fn record_request(&self, duration: Duration, success: bool) {
        let mut state = self.state.write().await;
        state.total_requests += 1;

        if !success {
            state.failed_requests += 1;
            return;
        }

        if state.latencies_ms.len() >= MAX_SAMPLES {
            state.latencies_ms.pop_front();
        }
        state.latencies_ms.push_back(duration.as_secs_f64() * 1000.0);
    }

    /// Computes the current metrics
    pub async fn get_metrics(&self) -> ProviderMetrics {
        let state = self.state.read().await;

        if state.total_requests == 0 {
            return ProviderMetrics::empty(&self.provider_name);
        }

        let mut latencies: Vec<f64> = state.latencies_ms.iter().copied().collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let succeeded = state.total_requests - state.failed_requests;

        ProviderMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: succeeded as f64 / state.total_requests as f64,
            total_requests: state.total_requests,
            failed_requests: state.failed_requests,
        }
    }
}

/// Nearest-rank percentile of sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let rank = (p / 100.0 * sorted_values.len() as f64).ceil() as usize;
    sorted_values[rank.saturating_sub(1).min(sorted_values.len() - 1)]
}
