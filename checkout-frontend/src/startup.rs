use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::{health_check, index},
    bills::lookup_bill,
    metrics::metrics,
    pay::{create_order, dismiss_payment, payment_page, verify_payment},
    receipt::receipt,
};
use crate::middleware::track_metrics;
use crate::AppState;

pub fn build_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/bills/lookup", post(lookup_bill))
        .route("/pay/:session_id", get(payment_page))
        .route("/pay/:session_id/order", post(create_order))
        .route("/pay/:session_id/verify", post(verify_payment))
        .route("/pay/:session_id/dismiss", post(dismiss_payment))
        .route("/success", get(receipt))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(from_fn(track_metrics))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the trace span sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
