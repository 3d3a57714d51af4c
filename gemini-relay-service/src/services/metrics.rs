//! Provider-level metrics for the relay.
//!
//! HTTP request counts and latencies come from the shared middleware; these
//! cover the upstream model call itself.

use metrics::{counter, histogram};

/// Record how long the provider took to answer (successfully or not).
pub fn record_provider_latency(provider: &'static str, model: &str, duration_secs: f64) {
    histogram!(
        "genai_provider_latency_seconds",
        "provider" => provider,
        "model" => model.to_string()
    )
    .record(duration_secs);
}

/// Record a provider error.
pub fn record_provider_error(provider: &'static str, error_type: &'static str) {
    counter!(
        "genai_provider_errors_total",
        "provider" => provider,
        "error_type" => error_type
    )
    .increment(1);
}

/// Record token usage reported by the provider.
pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    counter!("genai_tokens_total", "model" => model.to_string(), "type" => "input")
        .increment(input_tokens.max(0) as u64);
    counter!("genai_tokens_total", "model" => model.to_string(), "type" => "output")
        .increment(output_tokens.max(0) as u64);
}

/// Record a completed generation.
pub fn record_generation(route: &'static str, model: &str, finish_reason: &'static str) {
    counter!(
        "genai_requests_total",
        "route" => route,
        "model" => model.to_string(),
        "finish_reason" => finish_reason
    )
    .increment(1);
}
