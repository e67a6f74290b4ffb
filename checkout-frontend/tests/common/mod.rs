#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    response::Response,
    Router,
};
use checkout_frontend::config::{BackendSettings, CheckoutSettings};
use checkout_frontend::models::CheckoutOptions;
use checkout_frontend::services::{BackendClient, PaymentGateway};
use checkout_frontend::startup::build_router;
use checkout_frontend::AppState;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Gateway double that records every widget it was asked to open.
#[derive(Default)]
pub struct RecordingGateway {
    opened: Mutex<Vec<CheckoutOptions>>,
}

impl RecordingGateway {
    pub fn opened(&self) -> Vec<CheckoutOptions> {
        self.opened.lock().unwrap().clone()
    }
}

impl PaymentGateway for RecordingGateway {
    fn open(&self, options: &CheckoutOptions) {
        self.opened.lock().unwrap().push(options.clone());
    }
}

/// Router wired to a mock cart backend.
pub struct TestApp {
    pub backend: MockServer,
    pub client: BackendClient,
    pub gateway: Arc<RecordingGateway>,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;
        let settings = BackendSettings {
            base_url: backend.uri(),
            request_timeout_secs: 5,
        };
        let client = BackendClient::new(&settings).expect("Failed to build backend client");
        let gateway = Arc::new(RecordingGateway::default());

        let state = AppState::new(
            Arc::new(BackendClient::new(&settings).expect("Failed to build backend client")),
            gateway.clone(),
            CheckoutSettings::default(),
        );
        let router = build_router(state.clone(), "static");

        Self {
            backend,
            client,
            gateway,
            state,
            router,
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_empty(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn mock_session(&self, session_id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/session/{}", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.backend)
            .await;
    }

    pub async fn mock_order(&self, order_id: &str, amount: u64) {
        Mock::given(method("POST"))
            .and(path("/api/create-razorpay-order"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "key_id": "rzp_test_key",
                "amount": amount,
                "order_id": order_id,
            })))
            .mount(&self.backend)
            .await;
    }

    pub async fn backend_requests(&self) -> usize {
        self.backend
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// The Milk x2 cart used across the payment tests.
pub fn pending_session() -> Value {
    json!({
        "status": "pending",
        "items": [{ "name": "Milk", "price": 50, "quantity": 2 }],
        "total": 100,
    })
}

pub fn callback_body() -> Value {
    json!({
        "razorpay_order_id": "o1",
        "razorpay_payment_id": "p1",
        "razorpay_signature": "sig",
    })
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
