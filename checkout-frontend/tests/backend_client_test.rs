mod common;

use checkout_frontend::error::{CheckoutError, ErrorKind};
use checkout_frontend::models::{
    CreateOrderRequest, PaymentCallback, SessionStatus, VerifyPaymentRequest,
};
use checkout_frontend::services::CheckoutBackend;
use common::TestApp;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn get_bill_parses_backend_bill() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/bill/A100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "billId": "A100",
            "timestamp": 1709288100000i64,
            "items": [{ "name": "Milk", "price": 50, "quantity": 2 }],
            "total": 100,
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let bill = app.client.get_bill("A100").await.unwrap();

    assert_eq!(bill.bill_id, "A100");
    assert_eq!(bill.items.len(), 1);
    assert_eq!(bill.total_display(), "100");
}

#[tokio::test]
async fn missing_bill_carries_backend_message() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/bill/ZZZ"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "No such bill" })),
        )
        .mount(&app.backend)
        .await;

    let err = app.client.get_bill("ZZZ").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.user_message(), "No such bill");
}

#[tokio::test]
async fn missing_bill_without_body_uses_default_message() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/bill/ZZZ"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;

    let err = app.client.get_bill("ZZZ").await.unwrap_err();

    assert_eq!(err.user_message(), "Bill not found");
}

#[tokio::test]
async fn get_session_fills_in_requested_id() {
    let app = TestApp::spawn().await;
    app.mock_session("S1", common::pending_session()).await;

    let session = app.client.get_session("S1").await.unwrap();

    assert_eq!(session.id, "S1");
    assert_eq!(session.status, SessionStatus::Pending);
    assert_eq!(session.total, 100.0);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/session/S404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.backend)
        .await;

    let err = app.client.get_session("S404").await.unwrap_err();

    assert!(matches!(err, CheckoutError::SessionNotFound { .. }));
}

#[tokio::test]
async fn undecodable_session_is_malformed() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/session/S1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&app.backend)
        .await;

    let err = app.client.get_session("S1").await.unwrap_err();

    assert!(matches!(err, CheckoutError::MalformedResponse { call: "get_session", .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn create_order_posts_session_and_amount() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/create-razorpay-order"))
        .and(body_json(json!({ "sessionId": "S1", "amount": 100.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key_id": "rzp_test_key",
            "amount": 10000,
            "order_id": "o1",
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let order = app
        .client
        .create_order(&CreateOrderRequest {
            session_id: "S1".to_string(),
            amount: 100.0,
        })
        .await
        .unwrap();

    assert_eq!(order.order_id, "o1");
    assert_eq!(order.amount, 10000);
    assert_eq!(order.key_id, "rzp_test_key");
}

#[tokio::test]
async fn rejected_order_is_order_creation_failure() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/create-razorpay-order"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Session already paid" })),
        )
        .mount(&app.backend)
        .await;

    let err = app
        .client
        .create_order(&CreateOrderRequest {
            session_id: "S1".to_string(),
            amount: 100.0,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::OrderCreationFailed(ref msg) if msg == "Session already paid"));
}

#[tokio::test]
async fn declined_verification_is_a_value() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/verify-payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&app.backend)
        .await;

    let verdict = app
        .client
        .verify_payment(&VerifyPaymentRequest {
            session_id: "S1".to_string(),
            callback: PaymentCallback {
                razorpay_order_id: "o1".to_string(),
                razorpay_payment_id: "p1".to_string(),
                razorpay_signature: "bad".to_string(),
            },
        })
        .await
        .unwrap();

    assert!(!verdict.success);
    assert!(verdict.bill_id.is_none());
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let settings = checkout_frontend::config::BackendSettings {
        // Reserved port; nothing listens there.
        base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
    };
    let client = checkout_frontend::services::BackendClient::new(&settings).unwrap();

    let err = client.get_bill("A100").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.user_message(), "Bill not found");
}

#[tokio::test]
async fn failed_verification_call_is_verification_failure() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/verify-payment"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.backend)
        .await;

    let err = app
        .client
        .verify_payment(&VerifyPaymentRequest {
            session_id: "S1".to_string(),
            callback: PaymentCallback {
                razorpay_order_id: "o1".to_string(),
                razorpay_payment_id: "p1".to_string(),
                razorpay_signature: "sig".to_string(),
            },
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::VerificationFailed(_)));
    assert_eq!(err.kind(), ErrorKind::VerificationFailed);
}
