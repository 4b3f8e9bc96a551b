// Workflow Automation Engine
//
// Event-driven automation for the Atrium back-office platform. A business
// operation fires an event, the engine resolves it to the tenant's active
// workflows, and each workflow's ordered action list is dispatched to the
// configured collaborators.

pub mod actions;
pub mod engine;
pub mod executor;
pub mod registry;
pub mod store;
pub mod triggers;

pub use actions::{Action, ActionKind, ActionOutcome, ActionStatus, WorkflowRunSummary};
pub use engine::AutomationEngine;
pub use executor::WorkflowExecutor;
pub use registry::{ActionContext, ActionHandler, ActionOutput, ActionRegistry};
pub use store::{PgWorkflowStore, StoreError, Workflow, WorkflowStore};
pub use triggers::{
    BookingData, Event, EventData, LeadData, MessageData, StageChangeData, TriggerType,
};
