use super::session::{format_amount, LineItem};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Bill timestamp; the backend may send ISO text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BillTimestamp {
    Millis(i64),
    Text(String),
}

impl BillTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            BillTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            BillTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Human readable form; unparseable text is shown as received.
    pub fn display(&self) -> String {
        match (self.to_datetime(), self) {
            (Some(dt), _) => dt.format("%d %b %Y, %H:%M UTC").to_string(),
            (None, BillTimestamp::Text(raw)) => raw.clone(),
            (None, BillTimestamp::Millis(ms)) => ms.to_string(),
        }
    }
}

/// Finalized receipt from `GET /api/bill/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_id: String,
    pub timestamp: BillTimestamp,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total: f64,
}

impl Bill {
    pub fn total_display(&self) -> String {
        format_amount(self.total)
    }
}
