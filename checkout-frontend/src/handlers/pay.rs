//! Session payment pages and the widget callback endpoints.
//!
//! The page load fetches the session and parks the workflow in the
//! registry; `order`, `verify` and `dismiss` are driven by `pay.js` in the
//! browser as the customer works through the gateway widget.

use crate::error::ErrorKind;
use crate::handlers::{app::ErrorTemplate, page_status, receipt_location};
use crate::models::{CheckoutOptions, LineItem, PaymentCallback, PendingSession};
use crate::workflow::registry::SharedWorkflow;
use crate::workflow::{PaymentNotice, PaymentOrchestrator, PaymentState};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use service_core::error::AppError;
use tokio::sync::OwnedMutexGuard;
use validator::Validate;

#[derive(Template)]
#[template(path = "pay.html")]
pub struct PayTemplate {
    pub session_id: String,
    pub items: Vec<LineItem>,
    pub total: String,
    pub notice: Option<String>,
}

impl PayTemplate {
    fn new(session: &PendingSession, notice: Option<&PaymentNotice>) -> Self {
        Self {
            session_id: session.id.clone(),
            items: session.items.clone(),
            total: session.display_total_text(),
            notice: notice.map(|n| n.message().to_string()),
        }
    }
}

/// What the browser should do after a payment step.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayStepResponse {
    /// Open the gateway widget with these options.
    Checkout { options: CheckoutOptions },
    /// Navigate away, to the receipt.
    Redirect { location: String },
}

fn conflict(session_id: &str) -> AppError {
    tracing::warn!(session_id = %session_id, "Payment step already in progress");
    AppError::Conflict("A payment step is already in progress".to_string())
}

/// Lock the session's workflow, refusing if another step holds it. The
/// shared handle comes back too, for a scoped `release`.
fn lock_workflow(
    state: &AppState,
    session_id: &str,
    create: bool,
) -> Result<(SharedWorkflow, OwnedMutexGuard<PaymentOrchestrator>), AppError> {
    let shared = match state.workflows.get(session_id) {
        Some(shared) => shared,
        None if create => state.workflows.insert(state.new_workflow(session_id)),
        None => {
            return Err(AppError::Conflict(
                "No payment in progress for this session".to_string(),
            ))
        }
    };
    let guard = shared
        .clone()
        .try_lock_owned()
        .map_err(|_| conflict(session_id))?;
    Ok((shared, guard))
}

/// `GET /pay/{session_id}`: cart review with the pay action, or a redirect
/// to the receipt when the session is already settled.
pub async fn payment_page(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let mut workflow = state.new_workflow(&session_id);

    if let Err(err) = workflow.load().await {
        tracing::error!(session_id = %session_id, error = %err, "Fresh workflow refused to load");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let page = match workflow.state() {
        PaymentState::AlreadyPaid { bill_id } => {
            tracing::info!(session_id = %session_id, bill_id = %bill_id, "Session already paid");
            return Redirect::to(&receipt_location(bill_id)).into_response();
        }
        PaymentState::SessionError { kind, message } => {
            return (
                page_status(*kind),
                ErrorTemplate {
                    message: message.clone(),
                },
            )
                .into_response();
        }
        PaymentState::AwaitingPayment { session, notice } => {
            PayTemplate::new(session, notice.as_ref())
        }
        other => {
            tracing::error!(session_id = %session_id, state = other.name(), "Unexpected state after load");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Replaces whatever an earlier visit left behind, unless that one is
    // mid-step or has the gateway widget open in another tab.
    if state.workflows.insert_unless_busy(workflow).is_none() {
        tracing::info!(session_id = %session_id, "Kept in-flight payment workflow");
    }
    page.into_response()
}

/// `POST /pay/{session_id}/order`: the "pay now" action.
pub async fn create_order(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<PayStepResponse>, AppError> {
    let (shared, mut workflow) = lock_workflow(&state, &session_id, true)?;

    if matches!(
        workflow.state(),
        PaymentState::Loading | PaymentState::SessionError { .. }
    ) {
        workflow.load().await?;
    }

    if let Some(bill_id) = workflow.state().receipt_bill_id() {
        let location = receipt_location(bill_id);
        state.workflows.release(&session_id, &shared);
        return Ok(Json(PayStepResponse::Redirect { location }));
    }

    if let PaymentState::SessionError { message, kind } = workflow.state() {
        let err = match kind {
            ErrorKind::NotFound => AppError::NotFound(message.clone()),
            ErrorKind::Validation => AppError::BadRequest(message.clone()),
            _ => AppError::BadGateway(message.clone()),
        };
        state.workflows.release(&session_id, &shared);
        return Err(err);
    }

    let options = workflow.pay().await?;
    Ok(Json(PayStepResponse::Checkout { options }))
}

/// `POST /pay/{session_id}/verify`: the widget's success callback.
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(callback): Json<PaymentCallback>,
) -> Result<Json<PayStepResponse>, AppError> {
    callback.validate()?;

    let (shared, mut workflow) = lock_workflow(&state, &session_id, false)?;
    let bill_id = workflow.on_payment_success(callback).await?;

    tracing::info!(session_id = %session_id, bill_id = %bill_id, "Payment completed");
    state.workflows.release(&session_id, &shared);

    Ok(Json(PayStepResponse::Redirect {
        location: receipt_location(&bill_id),
    }))
}

/// `POST /pay/{session_id}/dismiss`: the widget was closed without paying.
pub async fn dismiss_payment(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let (_, mut workflow) = lock_workflow(&state, &session_id, false)?;
    workflow.on_dismiss()?;
    tracing::info!(session_id = %session_id, "Payment cancelled by customer");
    Ok(StatusCode::NO_CONTENT)
}
