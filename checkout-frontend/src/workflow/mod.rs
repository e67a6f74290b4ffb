pub mod bill_lookup;
pub mod orchestrator;
pub mod registry;
pub mod session_fetcher;

pub use bill_lookup::{normalize_bill_id, BillLookup};
pub use orchestrator::{PaymentNotice, PaymentOrchestrator, PaymentState};
pub use registry::WorkflowRegistry;
pub use session_fetcher::{fetch_session, route_session, SessionRoute};
