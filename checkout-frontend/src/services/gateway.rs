//! Payment gateway widget abstraction.
//!
//! The widget runs out of process (a host-provided overlay in the
//! customer's browser). The workflow only ever opens it; the outcome comes
//! back later as a [`GatewayOutcome`] delivered to the orchestrator's
//! callback hooks.

use crate::models::{CheckoutOptions, PaymentCallback};

pub trait PaymentGateway: Send + Sync {
    /// Hand the order to the widget. Completion is reported through a
    /// callback, never through this call.
    fn open(&self, options: &CheckoutOptions);
}

/// The two mutually exclusive ways a widget session ends.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    Paid(PaymentCallback),
    Dismissed,
}

/// Gateway used by the web server: the options travel back to the browser
/// in the HTTP response, where `checkout.js` opens the widget.
#[derive(Debug, Default, Clone)]
pub struct HostedCheckout;

impl PaymentGateway for HostedCheckout {
    fn open(&self, options: &CheckoutOptions) {
        tracing::info!(
            order_id = %options.order_id,
            amount = options.amount,
            currency = options.currency,
            "Handing order to browser checkout widget"
        );
    }
}
