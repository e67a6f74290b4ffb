use askama::Template;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub bill_id: String,
}

/// Full-page error shown for terminal failures.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
}

#[derive(Deserialize)]
pub struct IndexParams {
    #[serde(rename = "billId")]
    pub bill_id: Option<String>,
}

pub async fn index(Query(params): Query<IndexParams>) -> impl IntoResponse {
    IndexTemplate {
        bill_id: params.bill_id.unwrap_or_default(),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
