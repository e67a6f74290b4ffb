use crate::error::CheckoutError;
use crate::models::{PendingSession, Session, SessionStatus};
use crate::services::backend_client::CheckoutBackend;

/// Where a freshly fetched session sends the customer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionRoute {
    /// Already settled: show the receipt, never the pay action.
    Receipt { bill_id: String },
    /// Still owed: show the cart and the pay action.
    Pay(PendingSession),
}

/// Decide between receipt and payment from the session alone.
///
/// A paid session without a bill id is a malformed backend answer.
pub fn route_session(session: Session) -> Result<SessionRoute, CheckoutError> {
    match session.status {
        SessionStatus::Paid => match session.bill_id {
            Some(bill_id) if !bill_id.is_empty() => Ok(SessionRoute::Receipt { bill_id }),
            _ => Err(CheckoutError::MalformedResponse {
                call: "get_session",
                reason: format!("session {} is paid but has no bill id", session.id),
            }),
        },
        SessionStatus::Pending => Ok(SessionRoute::Pay(PendingSession {
            id: session.id,
            items: session.items,
            reported_total: session.total,
        })),
    }
}

/// Fetch a session; a blank id fails locally without a request.
pub async fn fetch_session(
    backend: &dyn CheckoutBackend,
    session_id: &str,
) -> Result<Session, CheckoutError> {
    if session_id.trim().is_empty() {
        return Err(CheckoutError::Validation("Missing session id".to_string()));
    }
    backend.get_session(session_id).await
}
