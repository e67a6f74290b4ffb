use crate::config::CheckoutSettings;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Orders are always raised in rupees.
pub const CURRENCY: &str = "INR";

/// Body of `POST /api/create-razorpay-order`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub session_id: String,
    pub amount: f64,
}

/// Gateway order issued through the backend, bound to one session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    /// Public gateway key used to initialise the widget.
    pub key_id: String,
    /// Amount in the gateway's smallest unit, as returned by the backend.
    pub amount: u64,
    pub order_id: String,
}

/// Identifier triple the gateway widget hands back after a payment.
///
/// Opaque to this service; forwarded verbatim for verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PaymentCallback {
    #[validate(length(min = 1))]
    pub razorpay_order_id: String,
    #[validate(length(min = 1))]
    pub razorpay_payment_id: String,
    #[validate(length(min = 1))]
    pub razorpay_signature: String,
}

/// Body of `POST /api/verify-payment`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentRequest {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(flatten)]
    pub callback: PaymentCallback,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    #[serde(default)]
    pub bill_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutTheme {
    pub color: String,
}

/// Options handed to the gateway widget when it is opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u64,
    pub currency: &'static str,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: CheckoutPrefill,
    pub theme: CheckoutTheme,
}

impl CheckoutOptions {
    pub fn new(order: &Order, settings: &CheckoutSettings) -> Self {
        Self {
            key: order.key_id.clone(),
            amount: order.amount,
            currency: CURRENCY,
            name: settings.merchant_name.clone(),
            description: settings.description.clone(),
            order_id: order.order_id.clone(),
            prefill: CheckoutPrefill {
                name: settings.prefill.name.clone(),
                email: settings.prefill.email.clone(),
                contact: settings.prefill.contact.clone(),
            },
            theme: CheckoutTheme {
                color: settings.theme_color.clone(),
            },
        }
    }
}
