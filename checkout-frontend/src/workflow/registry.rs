use crate::workflow::orchestrator::{PaymentOrchestrator, PaymentState};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub type SharedWorkflow = Arc<Mutex<PaymentOrchestrator>>;

struct Slot {
    workflow: SharedWorkflow,
    touched: Instant,
}

impl Slot {
    fn new(workflow: SharedWorkflow) -> Self {
        Self {
            workflow,
            touched: Instant::now(),
        }
    }
}

/// Live payment workflows keyed by session id.
///
/// Each workflow sits behind its own mutex; callers use `try_lock` so a
/// second action on the same session is refused rather than queued.
pub struct WorkflowRegistry {
    workflows: DashMap<String, Slot>,
    max_idle: Duration,
}

/// True while a step holds the workflow or the gateway widget is open.
fn is_busy(workflow: &SharedWorkflow) -> bool {
    match workflow.try_lock() {
        Ok(guard) => matches!(guard.state(), PaymentState::Verifying { .. }),
        Err(_) => true,
    }
}

impl WorkflowRegistry {
    pub fn new(max_idle: Duration) -> Self {
        Self {
            workflows: DashMap::new(),
            max_idle,
        }
    }

    pub fn get(&self, session_id: &str) -> Option<SharedWorkflow> {
        self.workflows.get_mut(session_id).map(|mut slot| {
            slot.touched = Instant::now();
            slot.workflow.clone()
        })
    }

    /// Register a workflow, replacing any previous one for the session.
    pub fn insert(&self, workflow: PaymentOrchestrator) -> SharedWorkflow {
        self.prune();

        let session_id = workflow.session_id().to_string();
        let shared = Arc::new(Mutex::new(workflow));
        self.workflows.insert(session_id, Slot::new(shared.clone()));
        shared
    }

    /// Register a workflow unless the session's current one is busy, in
    /// which case the current one is kept and `None` is returned.
    pub fn insert_unless_busy(&self, workflow: PaymentOrchestrator) -> Option<SharedWorkflow> {
        self.prune();

        let session_id = workflow.session_id().to_string();
        match self.workflows.entry(session_id) {
            Entry::Occupied(mut occupied) => {
                if is_busy(&occupied.get().workflow) {
                    occupied.get_mut().touched = Instant::now();
                    return None;
                }
                let shared = Arc::new(Mutex::new(workflow));
                occupied.insert(Slot::new(shared.clone()));
                Some(shared)
            }
            Entry::Vacant(vacant) => {
                let shared = Arc::new(Mutex::new(workflow));
                vacant.insert(Slot::new(shared.clone()));
                Some(shared)
            }
        }
    }

    /// Forget `workflow`. A newer workflow registered for the same session
    /// in the meantime is left alone.
    pub fn release(&self, session_id: &str, workflow: &SharedWorkflow) {
        let removed = self
            .workflows
            .remove_if(session_id, |_, slot| Arc::ptr_eq(&slot.workflow, workflow));
        if removed.is_some() {
            tracing::debug!(session_id = %session_id, "Released payment workflow");
        }
    }

    /// Drop workflows nobody has touched within the idle limit.
    pub fn prune(&self) {
        let before = self.workflows.len();
        self.workflows
            .retain(|_, slot| slot.touched.elapsed() < self.max_idle);
        let pruned = before.saturating_sub(self.workflows.len());
        if pruned > 0 {
            tracing::info!(pruned, "Pruned idle payment workflows");
        }
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckoutSettings;
    use crate::models::{LineItem, Session, SessionStatus};
    use crate::workflow::testing::{sample_order, FakeBackend, RecordingGateway};

    fn workflow(session_id: &str) -> PaymentOrchestrator {
        PaymentOrchestrator::new(
            session_id,
            Arc::new(FakeBackend::default()),
            Arc::new(RecordingGateway::default()),
            CheckoutSettings::default(),
        )
    }

    async fn verifying_workflow(session_id: &str) -> PaymentOrchestrator {
        let backend = FakeBackend::default()
            .with_session(Session {
                id: session_id.to_string(),
                status: SessionStatus::Pending,
                items: vec![LineItem {
                    name: "Milk".to_string(),
                    price: 50.0,
                    quantity: 2,
                }],
                total: 100.0,
                bill_id: None,
            })
            .with_order(sample_order());
        let mut workflow = PaymentOrchestrator::new(
            session_id,
            Arc::new(backend),
            Arc::new(RecordingGateway::default()),
            CheckoutSettings::default(),
        );
        workflow.load().await.unwrap();
        workflow.pay().await.unwrap();
        workflow
    }

    #[tokio::test]
    async fn busy_workflow_refuses_second_lock() {
        let registry = WorkflowRegistry::new(Duration::from_secs(60));
        registry.insert(workflow("S1"));

        let first = registry.get("S1").unwrap().try_lock_owned();
        assert!(first.is_ok());
        assert!(registry.get("S1").unwrap().try_lock_owned().is_err());
    }

    #[test]
    fn release_forgets_workflow() {
        let registry = WorkflowRegistry::new(Duration::from_secs(60));
        let shared = registry.insert(workflow("S1"));
        registry.release("S1", &shared);
        assert!(registry.get("S1").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn release_keeps_newer_workflow() {
        let registry = WorkflowRegistry::new(Duration::from_secs(60));
        let stale = registry.insert(workflow("S1"));
        let current = registry.insert(workflow("S1"));

        registry.release("S1", &stale);

        let kept = registry.get("S1").unwrap();
        assert!(Arc::ptr_eq(&kept, &current));
    }

    #[tokio::test]
    async fn verifying_workflow_is_not_replaced() {
        let registry = WorkflowRegistry::new(Duration::from_secs(60));
        let live = registry.insert(verifying_workflow("S1").await);

        assert!(registry.insert_unless_busy(workflow("S1")).is_none());

        assert!(Arc::ptr_eq(&registry.get("S1").unwrap(), &live));
        assert_eq!(live.lock().await.state().name(), "verifying");
    }

    #[tokio::test]
    async fn locked_workflow_is_not_replaced() {
        let registry = WorkflowRegistry::new(Duration::from_secs(60));
        let live = registry.insert(workflow("S1"));
        let _step = live.clone().try_lock_owned().unwrap();

        assert!(registry.insert_unless_busy(workflow("S1")).is_none());
        assert!(Arc::ptr_eq(&registry.get("S1").unwrap(), &live));
    }

    #[test]
    fn idle_workflow_is_replaced() {
        let registry = WorkflowRegistry::new(Duration::from_secs(60));
        let old = registry.insert(workflow("S1"));

        let fresh = registry.insert_unless_busy(workflow("S1")).unwrap();

        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(Arc::ptr_eq(&registry.get("S1").unwrap(), &fresh));
    }

    #[test]
    fn idle_workflows_are_pruned_on_insert() {
        let registry = WorkflowRegistry::new(Duration::ZERO);
        registry.insert(workflow("S1"));
        registry.insert(workflow("S2"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("S2").is_some());
    }
}
