use crate::handlers::page_status;
use crate::models::Bill;
use crate::workflow::BillLookup;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

#[derive(Template)]
#[template(path = "fragments/bill_result.html")]
pub struct BillResultTemplate {
    pub bill: Bill,
}

#[derive(Template)]
#[template(path = "fragments/bill_error.html")]
pub struct BillErrorTemplate {
    pub message: String,
}

#[derive(Deserialize)]
pub struct LookupForm {
    #[serde(rename = "billId", default)]
    pub bill_id: String,
}

/// HTMX fragment replacing the lookup result panel.
pub async fn lookup_bill(State(state): State<AppState>, Form(form): Form<LookupForm>) -> Response {
    let mut lookup = BillLookup::new(state.backend.clone());

    match lookup.lookup(&form.bill_id).await {
        Ok(bill) => BillResultTemplate { bill: bill.clone() }.into_response(),
        Err(err) => (
            page_status(err.kind()),
            BillErrorTemplate {
                message: err.user_message(),
            },
        )
            .into_response(),
    }
}
