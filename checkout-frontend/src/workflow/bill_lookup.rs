use crate::error::CheckoutError;
use crate::models::Bill;
use crate::services::backend_client::CheckoutBackend;
use std::sync::Arc;

/// Trim a typed bill id; blank input is rejected before any request.
pub fn normalize_bill_id(input: &str) -> Result<&str, CheckoutError> {
    let bill_id = input.trim();
    if bill_id.is_empty() {
        return Err(CheckoutError::Validation(
            "Please enter a Bill ID".to_string(),
        ));
    }
    Ok(bill_id)
}

/// Bill lookup panel: the last bill found, or the last error.
pub struct BillLookup {
    backend: Arc<dyn CheckoutBackend>,
    bill: Option<Bill>,
    error: Option<String>,
}

impl BillLookup {
    pub fn new(backend: Arc<dyn CheckoutBackend>) -> Self {
        Self {
            backend,
            bill: None,
            error: None,
        }
    }

    pub fn bill(&self) -> Option<&Bill> {
        self.bill.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Look up a bill. Whatever was shown before is cleared first.
    pub async fn lookup(&mut self, input: &str) -> Result<&Bill, CheckoutError> {
        self.bill = None;
        self.error = None;

        let bill_id = match normalize_bill_id(input) {
            Ok(bill_id) => bill_id,
            Err(err) => {
                self.error = Some(err.user_message());
                return Err(err);
            }
        };

        match self.backend.get_bill(bill_id).await {
            Ok(bill) => {
                tracing::info!(bill_id = %bill.bill_id, "Bill found");
                Ok(&*self.bill.insert(bill))
            }
            Err(err) => {
                tracing::info!(bill_id = %bill_id, error = %err, "Bill lookup failed");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }
}
