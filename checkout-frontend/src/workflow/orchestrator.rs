//! Payment workflow for one cart session.
//!
//! ```text
//! Loading ──► AlreadyPaid                       (session already settled)
//!    │    ──► SessionError                      (fetch failed)
//!    ▼
//! AwaitingPayment ──pay──► Verifying ──paid──► Completed
//!    ▲                        │
//!    └──── dismissed / verification failed ◄──┘
//! ```
//!
//! Every action runs at most one backend call and waits for it before the
//! next transition. Verification is never retried automatically: a failed
//! verification after a real charge needs the customer to act again.

use crate::config::CheckoutSettings;
use crate::error::{CheckoutError, ErrorKind};
use crate::models::{
    CheckoutOptions, CreateOrderRequest, Order, PaymentCallback, PendingSession,
    VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::services::backend_client::CheckoutBackend;
use crate::services::gateway::{GatewayOutcome, PaymentGateway};
use crate::services::metrics::record_transition;
use crate::workflow::session_fetcher::{fetch_session, route_session, SessionRoute};
use std::sync::Arc;

/// Why the customer is back at the pay action.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentNotice {
    InitiationFailed { reason: String },
    VerificationFailed { reason: String },
}

impl PaymentNotice {
    pub fn message(&self) -> &'static str {
        match self {
            PaymentNotice::InitiationFailed { .. } => "Payment initiation failed. Please try again.",
            PaymentNotice::VerificationFailed { .. } => "Payment verification failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentState {
    Loading,
    AwaitingPayment {
        session: PendingSession,
        notice: Option<PaymentNotice>,
    },
    AlreadyPaid {
        bill_id: String,
    },
    SessionError {
        kind: ErrorKind,
        message: String,
    },
    /// The widget is open for `order`; waiting for its callback.
    Verifying {
        session: PendingSession,
        order: Order,
    },
    Completed {
        bill_id: String,
    },
}

impl PaymentState {
    pub fn name(&self) -> &'static str {
        match self {
            PaymentState::Loading => "loading",
            PaymentState::AwaitingPayment {
                notice: Some(PaymentNotice::VerificationFailed { .. }),
                ..
            } => "verification_failed",
            PaymentState::AwaitingPayment { .. } => "awaiting_payment",
            PaymentState::AlreadyPaid { .. } => "already_paid",
            PaymentState::SessionError { .. } => "session_error",
            PaymentState::Verifying { .. } => "verifying",
            PaymentState::Completed { .. } => "completed",
        }
    }

    /// Bill to redirect to, once the session is settled.
    pub fn receipt_bill_id(&self) -> Option<&str> {
        match self {
            PaymentState::AlreadyPaid { bill_id } | PaymentState::Completed { bill_id } => {
                Some(bill_id)
            }
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentState::AlreadyPaid { .. }
                | PaymentState::Completed { .. }
                | PaymentState::SessionError { .. }
        )
    }
}

pub struct PaymentOrchestrator {
    session_id: String,
    backend: Arc<dyn CheckoutBackend>,
    gateway: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
    state: PaymentState,
}

impl PaymentOrchestrator {
    pub fn new(
        session_id: impl Into<String>,
        backend: Arc<dyn CheckoutBackend>,
        gateway: Arc<dyn PaymentGateway>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            backend,
            gateway,
            settings,
            state: PaymentState::Loading,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &PaymentState {
        &self.state
    }

    fn transition(&mut self, next: PaymentState) {
        let from = self.state.name();
        let to = next.name();
        tracing::info!(session_id = %self.session_id, from, to, "Payment workflow transition");
        record_transition(from, to);
        self.state = next;
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        tracing::warn!(
            session_id = %self.session_id,
            action,
            state = self.state.name(),
            "Rejected payment action"
        );
        CheckoutError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Fetch the session and settle into AwaitingPayment, AlreadyPaid or
    /// SessionError. Allowed from Loading and, as a manual retry, from
    /// SessionError.
    pub async fn load(&mut self) -> Result<&PaymentState, CheckoutError> {
        match self.state {
            PaymentState::Loading => {}
            PaymentState::SessionError { .. } => self.transition(PaymentState::Loading),
            _ => return Err(self.invalid("load session")),
        }

        let fetched = fetch_session(self.backend.as_ref(), &self.session_id).await;
        let next = match fetched.and_then(route_session) {
            Ok(SessionRoute::Receipt { bill_id }) => PaymentState::AlreadyPaid { bill_id },
            Ok(SessionRoute::Pay(session)) => PaymentState::AwaitingPayment {
                session,
                notice: None,
            },
            Err(err) => {
                tracing::warn!(session_id = %self.session_id, error = %err, "Session load failed");
                PaymentState::SessionError {
                    kind: err.kind(),
                    message: err.user_message(),
                }
            }
        };

        self.transition(next);
        Ok(&self.state)
    }

    /// "Pay now": create an order for the session and open the widget.
    ///
    /// On failure the workflow stays in AwaitingPayment with a notice.
    pub async fn pay(&mut self) -> Result<CheckoutOptions, CheckoutError> {
        let session = match &self.state {
            PaymentState::AwaitingPayment { session, .. } => session.clone(),
            _ => return Err(self.invalid("pay")),
        };

        let displayed = session.display_total();
        if (displayed - session.reported_total).abs() > 0.005 {
            tracing::warn!(
                session_id = %session.id,
                displayed,
                reported = session.reported_total,
                "Backend total differs from item total"
            );
        }

        let request = CreateOrderRequest {
            session_id: session.id.clone(),
            amount: session.reported_total,
        };

        match self.backend.create_order(&request).await {
            Ok(order) => {
                let options = CheckoutOptions::new(&order, &self.settings);
                self.gateway.open(&options);
                self.transition(PaymentState::Verifying { session, order });
                Ok(options)
            }
            Err(err) => {
                tracing::warn!(session_id = %session.id, error = %err, "Payment initiation failed");
                self.transition(PaymentState::AwaitingPayment {
                    session,
                    notice: Some(PaymentNotice::InitiationFailed {
                        reason: err.to_string(),
                    }),
                });
                Err(err)
            }
        }
    }

    /// Widget success hook: verify the callback and complete with the bill.
    ///
    /// Any failure returns the workflow to AwaitingPayment.
    pub async fn on_payment_success(
        &mut self,
        callback: PaymentCallback,
    ) -> Result<String, CheckoutError> {
        let (session, order) = match &self.state {
            PaymentState::Verifying { session, order } => (session.clone(), order.clone()),
            _ => return Err(self.invalid("confirm payment")),
        };

        if callback.razorpay_order_id != order.order_id {
            tracing::warn!(
                session_id = %session.id,
                expected = %order.order_id,
                received = %callback.razorpay_order_id,
                "Callback order id differs from the opened order"
            );
        }

        let request = VerifyPaymentRequest {
            session_id: session.id.clone(),
            callback,
        };

        let failure = match self.backend.verify_payment(&request).await {
            Ok(VerifyPaymentResponse {
                success: true,
                bill_id: Some(bill_id),
            }) if !bill_id.is_empty() => {
                self.transition(PaymentState::Completed {
                    bill_id: bill_id.clone(),
                });
                return Ok(bill_id);
            }
            Ok(VerifyPaymentResponse { success: true, .. }) => CheckoutError::VerificationFailed(
                "verification succeeded without a bill id".to_string(),
            ),
            Ok(_) => CheckoutError::VerificationFailed(
                "backend rejected the payment proof".to_string(),
            ),
            Err(err @ CheckoutError::VerificationFailed(_)) => err,
            Err(err) => CheckoutError::VerificationFailed(err.to_string()),
        };

        tracing::warn!(session_id = %session.id, error = %failure, "Payment verification failed");
        self.transition(PaymentState::AwaitingPayment {
            session,
            notice: Some(PaymentNotice::VerificationFailed {
                reason: failure.to_string(),
            }),
        });
        Err(failure)
    }

    /// Widget dismiss hook: back to the pay action, nothing reordered.
    pub fn on_dismiss(&mut self) -> Result<(), CheckoutError> {
        let session = match &self.state {
            PaymentState::Verifying { session, .. } => session.clone(),
            _ => return Err(self.invalid("dismiss payment")),
        };
        self.transition(PaymentState::AwaitingPayment {
            session,
            notice: None,
        });
        Ok(())
    }

    /// Dispatch a widget outcome to the matching hook. Returns the bill id
    /// when the payment completed.
    pub async fn resolve(&mut self, outcome: GatewayOutcome) -> Result<Option<String>, CheckoutError> {
        match outcome {
            GatewayOutcome::Paid(callback) => self.on_payment_success(callback).await.map(Some),
            GatewayOutcome::Dismissed => self.on_dismiss().map(|()| None),
        }
    }
}
