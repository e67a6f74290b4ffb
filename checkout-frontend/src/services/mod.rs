pub mod backend_client;
pub mod gateway;
pub mod metrics;

pub use backend_client::{BackendClient, CheckoutBackend};
pub use gateway::{GatewayOutcome, HostedCheckout, PaymentGateway};
