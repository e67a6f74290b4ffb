use serde::{Deserialize, Serialize};

/// One cart line as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    pub fn line_total_display(&self) -> String {
        format_amount(self.line_total())
    }
}

/// Sum of `price * quantity` over `items`.
pub fn items_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_total).sum()
}

/// Rupee amount without trailing `.00` for whole values.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Paid,
    /// Anything the backend reports other than `paid` is still payable.
    #[serde(other)]
    Pending,
}

/// Cart session as returned by `GET /api/session/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Filled in from the request path; the backend does not echo it.
    #[serde(default, alias = "sessionId")]
    pub id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub bill_id: Option<String>,
}

/// A session that still needs paying, kept for display and order creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSession {
    pub id: String,
    pub items: Vec<LineItem>,
    /// Total as reported by the backend; sent with the order request.
    pub reported_total: f64,
}

impl PendingSession {
    /// Total shown to the customer, recomputed from the line items.
    pub fn display_total(&self) -> f64 {
        items_total(&self.items)
    }

    pub fn display_total_text(&self) -> String {
        format_amount(self.display_total())
    }
}
