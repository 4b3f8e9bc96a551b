// Shared test doubles and builders for engine-level tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::ExecutionConfig;
use crate::error::ActionError;
use crate::services::email::{EmailError, EmailSender};
use crate::services::gating::{FeatureGate, GateError};
use crate::services::tasks::{NotifyError, TaskError, TaskRequest, TaskSink, TeamNotifier};
use crate::services::whatsapp::{MessageError, MessageKind, MessageSender};
use crate::workflows::actions::Action;
use crate::workflows::engine::AutomationEngine;
use crate::workflows::registry::{ActionContext, ActionHandler, ActionOutput, ActionRegistry};
use crate::workflows::store::{StoreError, Workflow, WorkflowStore};
use crate::workflows::triggers::{LeadData, TriggerType};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ===== Stores =====

/// In-memory store honoring the lookup contract: exact tenant and trigger
/// match, active only, insertion order preserved.
pub struct MemoryWorkflowStore {
    workflows: Vec<Workflow>,
}

impl MemoryWorkflowStore {
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self { workflows }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn find_active(
        &self,
        organization_id: Uuid,
        trigger: TriggerType,
    ) -> Result<Vec<Workflow>, StoreError> {
        Ok(self
            .workflows
            .iter()
            .filter(|w| {
                w.organization_id == organization_id && w.trigger == trigger && w.is_active
            })
            .cloned()
            .collect())
    }
}

/// Store whose lookups always fail, as if the database were unreachable.
pub struct FailingStore;

#[async_trait]
impl WorkflowStore for FailingStore {
    async fn find_active(
        &self,
        _organization_id: Uuid,
        _trigger: TriggerType,
    ) -> Result<Vec<Workflow>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

// ===== Collaborator doubles =====

#[derive(Default)]
pub struct RecordingEmail {
    pub fail: bool,
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingEmail {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmail {
    async fn send_notification(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Failed("simulated outage".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    pub fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingMessenger {
    async fn send_message(
        &self,
        to: &str,
        body: &str,
        _kind: MessageKind,
    ) -> Result<String, MessageError> {
        if self.fail {
            return Err(MessageError::Provider("simulated outage".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(format!("wamid.test-{}", self.sent.lock().unwrap().len()))
    }
}

#[derive(Default)]
pub struct RecordingTaskSink {
    created: Mutex<Vec<TaskRequest>>,
}

impl RecordingTaskSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> Vec<TaskRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskSink for RecordingTaskSink {
    async fn create_task(&self, request: TaskRequest) -> Result<Uuid, TaskError> {
        self.created.lock().unwrap().push(request);
        Ok(Uuid::new_v4())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notified: Mutex<Vec<(Uuid, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notified(&self) -> Vec<(Uuid, String)> {
        self.notified.lock().unwrap().clone()
    }
}

#[async_trait]
impl TeamNotifier for RecordingNotifier {
    async fn notify_members(
        &self,
        organization_id: Uuid,
        message: &str,
    ) -> Result<(), NotifyError> {
        self.notified
            .lock()
            .unwrap()
            .push((organization_id, message.to_string()));
        Ok(())
    }
}

// ===== Gates =====

pub struct StaticGate {
    pub enabled: bool,
}

#[async_trait]
impl FeatureGate for StaticGate {
    async fn automation_enabled(&self, _organization_id: Uuid) -> Result<bool, GateError> {
        Ok(self.enabled)
    }
}

pub struct ErrorGate;

#[async_trait]
impl FeatureGate for ErrorGate {
    async fn automation_enabled(&self, _organization_id: Uuid) -> Result<bool, GateError> {
        Err(GateError::Database(sqlx::Error::PoolClosed))
    }
}

// ===== Misbehaving handlers =====

/// Handler that panics; the executor must contain it.
pub struct PanickingHandler;

#[async_trait]
impl ActionHandler for PanickingHandler {
    async fn execute(&self, _ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        panic!("handler bug");
    }
}

/// Handler that never finishes within any reasonable timeout.
pub struct StalledHandler;

#[async_trait]
impl ActionHandler for StalledHandler {
    async fn execute(&self, _ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(ActionOutput::Completed(None))
    }
}

/// Handler recording the `tag` value of each config it sees, for ordering
/// assertions.
pub struct TagRecorder {
    tags: Mutex<Vec<String>>,
}

impl TagRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tags: Mutex::new(Vec::new()),
        })
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionHandler for TagRecorder {
    async fn execute(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let tag = ctx.config["tag"].as_str().unwrap_or("?").to_string();
        self.tags.lock().unwrap().push(tag);
        Ok(ActionOutput::Completed(None))
    }
}

// ===== Mocks =====

mockall::mock! {
    pub EmailCollaborator {}

    #[async_trait]
    impl EmailSender for EmailCollaborator {
        async fn send_notification(
            &self,
            to: &str,
            subject: &str,
            body: &str,
        ) -> Result<(), EmailError>;
    }
}

// ===== Builders =====

pub fn workflow(
    organization_id: Uuid,
    trigger: TriggerType,
    actions: Vec<Action>,
    is_active: bool,
) -> Workflow {
    Workflow {
        id: Uuid::new_v4(),
        organization_id,
        name: "test workflow".to_string(),
        trigger,
        actions,
        is_active,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn named_workflow(
    organization_id: Uuid,
    trigger: TriggerType,
    name: &str,
    actions: Vec<Action>,
) -> Workflow {
    Workflow {
        name: name.to_string(),
        ..workflow(organization_id, trigger, actions, true)
    }
}

pub fn lead(name: &str, email: Option<&str>) -> LeadData {
    LeadData {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.map(str::to_owned),
        phone: None,
        source: Some("chat-widget".to_string()),
        stage: None,
    }
}

pub fn engine_with(
    store: Arc<dyn WorkflowStore>,
    registry: ActionRegistry,
) -> AutomationEngine {
    AutomationEngine::new(store, registry, ExecutionConfig::default())
}
