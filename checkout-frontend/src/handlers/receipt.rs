use crate::handlers::app::ErrorTemplate;
use askama::Template;
use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessTemplate {
    pub bill_id: String,
}

#[derive(Deserialize)]
pub struct ReceiptParams {
    #[serde(rename = "billId")]
    pub bill_id: Option<String>,
}

/// Receipt view reached after a completed or already-settled payment.
pub async fn receipt(Query(params): Query<ReceiptParams>) -> Response {
    match params.bill_id.filter(|id| !id.trim().is_empty()) {
        Some(bill_id) => SuccessTemplate { bill_id }.into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            ErrorTemplate {
                message: "Missing bill id".to_string(),
            },
        )
            .into_response(),
    }
}
