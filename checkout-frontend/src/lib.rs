pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod workflow;

use config::CheckoutSettings;
use services::{CheckoutBackend, PaymentGateway};
use std::sync::Arc;
use std::time::Duration;
use workflow::{PaymentOrchestrator, WorkflowRegistry};

/// Shared application state: backend client, gateway and live workflows.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn CheckoutBackend>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub workflows: Arc<WorkflowRegistry>,
    pub checkout: CheckoutSettings,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn CheckoutBackend>,
        gateway: Arc<dyn PaymentGateway>,
        checkout: CheckoutSettings,
    ) -> Self {
        let workflows = Arc::new(WorkflowRegistry::new(Duration::from_secs(
            checkout.workflow_idle_secs,
        )));
        Self {
            backend,
            gateway,
            workflows,
            checkout,
        }
    }

    /// A fresh workflow for `session_id`, in the Loading state.
    pub fn new_workflow(&self, session_id: &str) -> PaymentOrchestrator {
        PaymentOrchestrator::new(
            session_id,
            self.backend.clone(),
            self.gateway.clone(),
            self.checkout.clone(),
        )
    }
}
