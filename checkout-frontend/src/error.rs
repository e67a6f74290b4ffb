use service_core::error::AppError;
use thiserror::Error;

/// Broad error categories surfaced to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad local input; no request was made.
    Validation,
    /// The backend returned non-success for a lookup.
    NotFound,
    /// Transport failure or an unreadable backend response.
    Network,
    /// The backend refused to create an order.
    Rejected,
    /// The backend rejected the payment proof.
    VerificationFailed,
    /// The action does not fit the workflow's current state.
    Conflict,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),

    #[error("Session {session_id} not found")]
    SessionNotFound { session_id: String },

    #[error("Bill {bill_id} not found")]
    BillNotFound {
        bill_id: String,
        /// Error text from the backend body, if it sent one.
        message: Option<String>,
    },

    #[error("Order creation failed: {0}")]
    OrderCreationFailed(String),

    #[error("Payment verification failed: {0}")]
    VerificationFailed(String),

    #[error("{call} request failed: {source}")]
    Network {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{call} returned an unreadable response: {reason}")]
    MalformedResponse { call: &'static str, reason: String },

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl CheckoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::Validation(_) => ErrorKind::Validation,
            CheckoutError::SessionNotFound { .. } | CheckoutError::BillNotFound { .. } => {
                ErrorKind::NotFound
            }
            CheckoutError::OrderCreationFailed(_) => ErrorKind::Rejected,
            CheckoutError::VerificationFailed(_) => ErrorKind::VerificationFailed,
            CheckoutError::Network { .. } | CheckoutError::MalformedResponse { .. } => {
                ErrorKind::Network
            }
            CheckoutError::InvalidTransition { .. } => ErrorKind::Conflict,
        }
    }

    /// Message shown to the customer.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Validation(msg) => msg.clone(),
            CheckoutError::SessionNotFound { .. } => "Session not found".to_string(),
            CheckoutError::BillNotFound { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Bill not found".to_string()),
            CheckoutError::OrderCreationFailed(_) => "Payment initiation failed".to_string(),
            CheckoutError::VerificationFailed(_) => "Payment verification failed".to_string(),
            CheckoutError::Network { call, .. } | CheckoutError::MalformedResponse { call, .. } => {
                match *call {
                    "get_bill" => "Bill not found".to_string(),
                    _ => "Error loading payment details".to_string(),
                }
            }
            CheckoutError::InvalidTransition { .. } => {
                "A payment step is already in progress".to_string()
            }
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        let message = err.user_message();
        match err.kind() {
            ErrorKind::Validation => AppError::BadRequest(message),
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::Network => AppError::BadGateway(message),
            ErrorKind::Rejected => AppError::BadGateway(message),
            ErrorKind::VerificationFailed => AppError::PaymentFailed(message),
            ErrorKind::Conflict => AppError::Conflict(message),
        }
    }
}
