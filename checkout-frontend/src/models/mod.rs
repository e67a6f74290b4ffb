pub mod bill;
pub mod order;
pub mod session;

pub use bill::{Bill, BillTimestamp};
pub use order::{
    CheckoutOptions, CreateOrderRequest, Order, PaymentCallback, VerifyPaymentRequest,
    VerifyPaymentResponse, CURRENCY,
};
pub use session::{format_amount, items_total, LineItem, PendingSession, Session, SessionStatus};
