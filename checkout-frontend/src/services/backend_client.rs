//! HTTP client for the cart backend.
//!
//! The backend owns bills, sessions, order creation and signature
//! verification; this client only maps its four endpoints onto typed calls
//! and the checkout error taxonomy.

use crate::config::BackendSettings;
use crate::error::CheckoutError;
use crate::models::{
    Bill, CreateOrderRequest, Order, Session, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::services::metrics::record_backend_call;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// The backend operations the checkout workflow depends on.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn get_bill(&self, bill_id: &str) -> Result<Bill, CheckoutError>;

    async fn get_session(&self, session_id: &str) -> Result<Session, CheckoutError>;

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, CheckoutError>;

    /// Forward a gateway callback. `success: false` is returned as a value;
    /// only non-2xx and transport failures are errors.
    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse, CheckoutError>;
}

/// `{"error": "..."}` body the backend sends on failures.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    error: Option<String>,
}

pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid backend base_url {}: {}", settings.base_url, e))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Backend base_url {} cannot be a base", settings.base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_json<T: DeserializeOwned>(
        call: &'static str,
        response: Response,
    ) -> Result<T, CheckoutError> {
        response
            .json::<T>()
            .await
            .map_err(|e| CheckoutError::MalformedResponse {
                call,
                reason: e.to_string(),
            })
    }

    async fn error_message(response: Response) -> Option<String> {
        response
            .json::<BackendErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
    }

    fn network_error(call: &'static str, url: &Url, source: reqwest::Error) -> CheckoutError {
        tracing::error!(call, url = %url, error = %source, "Backend request failed");
        record_backend_call(call, "network_error");
        CheckoutError::Network { call, source }
    }
}

#[async_trait]
impl CheckoutBackend for BackendClient {
    async fn get_bill(&self, bill_id: &str) -> Result<Bill, CheckoutError> {
        const CALL: &str = "get_bill";
        let url = self.endpoint(&["api", "bill", bill_id]);

        let response = self
            .client
            .traced_get(url.clone())
            .send()
            .await
            .map_err(|e| Self::network_error(CALL, &url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(bill_id = %bill_id, status = %status, "Bill lookup failed");
            record_backend_call(CALL, "not_found");
            return Err(CheckoutError::BillNotFound {
                bill_id: bill_id.to_string(),
                message: Self::error_message(response).await,
            });
        }

        record_backend_call(CALL, "ok");
        Self::read_json(CALL, response).await
    }

    async fn get_session(&self, session_id: &str) -> Result<Session, CheckoutError> {
        const CALL: &str = "get_session";
        let url = self.endpoint(&["api", "session", session_id]);

        let response = self
            .client
            .traced_get(url.clone())
            .send()
            .await
            .map_err(|e| Self::network_error(CALL, &url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(session_id = %session_id, status = %status, "Session fetch failed");
            record_backend_call(CALL, "not_found");
            return Err(CheckoutError::SessionNotFound {
                session_id: session_id.to_string(),
            });
        }

        record_backend_call(CALL, "ok");
        let mut session: Session = Self::read_json(CALL, response).await?;
        session.id = session_id.to_string();
        Ok(session)
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, CheckoutError> {
        const CALL: &str = "create_order";
        let url = self.endpoint(&["api", "create-razorpay-order"]);

        let response = self
            .client
            .traced_post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| Self::network_error(CALL, &url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| format!("backend returned {}", status));
            tracing::warn!(
                session_id = %request.session_id,
                status = %status,
                message = %message,
                "Order creation rejected"
            );
            record_backend_call(CALL, "rejected");
            return Err(CheckoutError::OrderCreationFailed(message));
        }

        record_backend_call(CALL, "ok");
        let order: Order = Self::read_json(CALL, response).await?;
        tracing::info!(
            session_id = %request.session_id,
            order_id = %order.order_id,
            amount = order.amount,
            "Order created"
        );
        Ok(order)
    }

    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse, CheckoutError> {
        const CALL: &str = "verify_payment";
        let url = self.endpoint(&["api", "verify-payment"]);

        let response = self
            .client
            .traced_post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| Self::network_error(CALL, &url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| format!("backend returned {}", status));
            tracing::warn!(
                session_id = %request.session_id,
                order_id = %request.callback.razorpay_order_id,
                status = %status,
                "Payment verification rejected"
            );
            record_backend_call(CALL, "rejected");
            return Err(CheckoutError::VerificationFailed(message));
        }

        let verdict: VerifyPaymentResponse = Self::read_json(CALL, response).await?;
        record_backend_call(CALL, if verdict.success { "ok" } else { "declined" });
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> BackendClient {
        BackendClient::new(&BackendSettings {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoint_encodes_segments() {
        let url = client("http://backend.local").endpoint(&["api", "bill", "A 1/2"]);
        assert_eq!(url.as_str(), "http://backend.local/api/bill/A%201%2F2");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = client("http://backend.local/trolley/").endpoint(&["api", "session", "S1"]);
        assert_eq!(url.as_str(), "http://backend.local/trolley/api/session/S1");
    }

    #[test]
    fn rejects_non_base_url() {
        let result = BackendClient::new(&BackendSettings {
            base_url: "mailto:ops@example.com".to_string(),
            request_timeout_secs: 5,
        });
        assert!(result.is_err());
    }
}
