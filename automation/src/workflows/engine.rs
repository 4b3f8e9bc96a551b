// Automation Engine - resolves fired events to workflows and executes them

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::actions::WorkflowRunSummary;
use super::executor::WorkflowExecutor;
use super::registry::ActionRegistry;
use super::store::WorkflowStore;
use super::triggers::{BookingData, Event, LeadData, MessageData, StageChangeData};
use crate::config::ExecutionConfig;
use crate::services::gating::FeatureGate;
use crate::services::metrics::AutomationMetrics;

/// The event bus and executor front-end.
///
/// Firing an event is best-effort: it never blocks the business operation
/// that produced the event and never surfaces an error to it. Every
/// collaborator arrives through the constructor, so tests can assemble the
/// engine from doubles.
#[derive(Clone)]
pub struct AutomationEngine {
    store: Arc<dyn WorkflowStore>,
    executor: WorkflowExecutor,
    gate: Option<Arc<dyn FeatureGate>>,
    metrics: Arc<AutomationMetrics>,
}

impl std::fmt::Debug for AutomationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationEngine")
            .field("gated", &self.gate.is_some())
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

impl AutomationEngine {
    pub fn new(
        store: Arc<dyn WorkflowStore>,
        registry: ActionRegistry,
        execution: ExecutionConfig,
    ) -> Self {
        let metrics = Arc::new(AutomationMetrics::new());
        let executor = WorkflowExecutor::new(
            Arc::new(registry),
            Arc::clone(&metrics),
            execution.action_timeout,
        );

        Self {
            store,
            executor,
            gate: None,
            metrics,
        }
    }

    /// Consult a plan gate before running a tenant's automations.
    pub fn with_feature_gate(mut self, gate: Arc<dyn FeatureGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn metrics(&self) -> &AutomationMetrics {
        &self.metrics
    }

    /// Fire an event without waiting for the automations it triggers.
    ///
    /// The work runs on a detached background task with its own error
    /// boundary; the caller's operation is never blocked or failed by it.
    pub fn fire(&self, event: Event) {
        let engine = self.clone();
        tokio::spawn(async move {
            engine.handle_event(&event).await;
        });
    }

    /// Resolve an event to matching workflows and run each of them.
    ///
    /// Awaitable form of [`fire`](Self::fire); used directly by tests and
    /// by callers that want the run summaries. Infallible by contract: a
    /// failed lookup degrades to an empty match set.
    pub async fn handle_event(&self, event: &Event) -> Vec<WorkflowRunSummary> {
        self.metrics.event_fired();
        info!(
            "Processing {} event for organization {}",
            event.trigger.as_str(),
            event.organization_id
        );

        if let Some(gate) = &self.gate {
            match gate.automation_enabled(event.organization_id).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(
                        "Automation disabled for organization {}, ignoring event",
                        event.organization_id
                    );
                    return Vec::new();
                }
                // Fail open: an unavailable gate must not silence automation
                Err(e) => {
                    warn!("Feature gate unavailable, continuing: {}", e);
                }
            }
        }

        let workflows = match self
            .store
            .find_active(event.organization_id, event.trigger)
            .await
        {
            Ok(workflows) => workflows,
            Err(e) => {
                error!("Workflow lookup failed, skipping event: {}", e);
                self.metrics.lookup_failed();
                return Vec::new();
            }
        };

        info!("Found {} matching workflows", workflows.len());
        self.metrics.workflows_matched(workflows.len() as u64);

        let mut summaries = Vec::with_capacity(workflows.len());
        for workflow in &workflows {
            summaries.push(self.executor.run(workflow, event).await);
        }

        summaries
    }

    // ===== Convenience wrappers for common events =====

    pub fn fire_new_lead(&self, organization_id: Uuid, lead: LeadData) {
        self.fire(Event::new_lead(organization_id, lead));
    }

    pub fn fire_new_booking(&self, organization_id: Uuid, booking: BookingData) {
        self.fire(Event::new_booking(organization_id, booking));
    }

    pub fn fire_booking_confirmed(&self, organization_id: Uuid, booking: BookingData) {
        self.fire(Event::booking_confirmed(organization_id, booking));
    }

    pub fn fire_booking_cancelled(&self, organization_id: Uuid, booking: BookingData) {
        self.fire(Event::booking_cancelled(organization_id, booking));
    }

    pub fn fire_lead_stage_changed(&self, organization_id: Uuid, change: StageChangeData) {
        self.fire(Event::lead_stage_changed(organization_id, change));
    }

    pub fn fire_message_received(&self, organization_id: Uuid, message: MessageData) {
        self.fire(Event::message_received(organization_id, message));
    }
}
