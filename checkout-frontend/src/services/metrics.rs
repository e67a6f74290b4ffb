use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static BACKEND_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static CHECKOUT_TRANSITIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;
    let request_duration = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )?;
    let backend_requests = IntCounterVec::new(
        Opts::new("backend_requests_total", "Calls made to the cart backend"),
        &["call", "outcome"],
    )?;
    let transitions = IntCounterVec::new(
        Opts::new(
            "checkout_transitions_total",
            "Payment workflow state transitions",
        ),
        &["from", "to"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(request_duration.clone()))?;
    registry.register(Box::new(backend_requests.clone()))?;
    registry.register(Box::new(transitions.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = BACKEND_REQUESTS_TOTAL.set(backend_requests);
    let _ = CHECKOUT_TRANSITIONS_TOTAL.set(transitions);

    Ok(())
}

// Recorders are no-ops until `init_metrics` has run (e.g. in unit tests).

pub fn record_http(method: &str, path: &str, status: u16, seconds: f64) {
    let status = status.to_string();
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, &status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path, &status])
            .observe(seconds);
    }
}

pub fn record_backend_call(call: &str, outcome: &str) {
    if let Some(counter) = BACKEND_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[call, outcome]).inc();
    }
}

pub fn record_transition(from: &str, to: &str) {
    if let Some(counter) = CHECKOUT_TRANSITIONS_TOTAL.get() {
        counter.with_label_values(&[from, to]).inc();
    }
}

pub fn get_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
