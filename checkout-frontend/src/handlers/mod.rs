pub mod app;
pub mod bills;
pub mod metrics;
pub mod pay;
pub mod receipt;

use crate::error::ErrorKind;
use axum::http::StatusCode;

/// Status code for an HTML page or fragment reporting an error of `kind`.
pub fn page_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Network | ErrorKind::Rejected => StatusCode::BAD_GATEWAY,
        ErrorKind::VerificationFailed => StatusCode::PAYMENT_REQUIRED,
        ErrorKind::Conflict => StatusCode::CONFLICT,
    }
}

/// Receipt page location for a settled bill.
pub fn receipt_location(bill_id: &str) -> String {
    let query = serde_urlencoded::to_string([("billId", bill_id)]).unwrap_or_default();
    format!("/success?{}", query)
}
