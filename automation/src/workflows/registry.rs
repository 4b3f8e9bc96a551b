// Action Dispatch Registry - maps action kinds to collaborator calls

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use super::actions::ActionKind;
use super::triggers::TriggerType;
use crate::error::ActionError;
use crate::services::email::EmailSender;
use crate::services::tasks::{TaskRequest, TaskSink, TeamNotifier};
use crate::services::whatsapp::{MessageKind, MessageSender};

/// Everything a handler may need: the resolved configuration, the event
/// payload, and the owning workflow for labeling.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub organization_id: Uuid,
    pub trigger: TriggerType,
    pub workflow_id: Uuid,
    pub workflow_name: String,
    /// Action configuration with template placeholders already resolved.
    pub config: serde_json::Value,
    /// Flattened event payload.
    pub payload: serde_json::Value,
}

impl ActionContext {
    fn payload_str(&self, field: &str) -> Option<String> {
        self.payload
            .get(field)
            .and_then(|v| v.as_str())
            .map(str::to_owned)
    }
}

/// What a handler produced.
#[derive(Debug, Clone)]
pub enum ActionOutput {
    Completed(Option<serde_json::Value>),
    /// The handler declined to run (e.g. its collaborator is not wired).
    Skipped(String),
}

/// One side-effecting step. Implementations must not panic; the executor
/// contains panics anyway, but a panicking handler is a bug.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn execute(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError>;
}

/// Typed dispatch table from action kind to handler.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<ActionKind, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the built-in handlers. Task and team-notification collaborators
    /// are optional; their actions skip with a log entry when absent.
    pub fn with_defaults(
        email: Arc<dyn EmailSender>,
        messaging: Arc<dyn MessageSender>,
        tasks: Option<Arc<dyn TaskSink>>,
        team: Option<Arc<dyn TeamNotifier>>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(ActionKind::SendEmail, Arc::new(SendEmailHandler { email }));
        registry.register(
            ActionKind::SendWhatsapp,
            Arc::new(SendWhatsAppHandler { messaging }),
        );
        registry.register(ActionKind::CreateTask, Arc::new(CreateTaskHandler { tasks }));
        registry.register(ActionKind::NotifyTeam, Arc::new(NotifyTeamHandler { team }));
        registry
    }

    pub fn register(&mut self, kind: ActionKind, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(kind, handler);
    }

    pub fn get(&self, kind: ActionKind) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(&kind).cloned()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ===== Built-in handlers =====

#[derive(Debug, Clone, Default, Deserialize)]
struct SendEmailConfig {
    to: Option<String>,
    subject: Option<String>,
    body: Option<String>,
}

/// Sends a notification email. The recipient comes from the action config,
/// falling back to the event payload's `email` field.
pub struct SendEmailHandler {
    pub email: Arc<dyn EmailSender>,
}

#[async_trait]
impl ActionHandler for SendEmailHandler {
    async fn execute(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let cfg = decode_config::<SendEmailConfig>(&ctx.config)?;

        let to = cfg
            .to
            .or_else(|| ctx.payload_str("email"))
            .ok_or_else(|| ActionError::BadConfig("no resolvable recipient".to_string()))?;

        let subject = cfg
            .subject
            .unwrap_or_else(|| format!("Notification from {}", crate::APP_NAME));
        let body = cfg.body.unwrap_or_else(|| {
            format!(
                "Event: {}\n\nWorkflow: {}",
                ctx.trigger.as_str(),
                ctx.workflow_name
            )
        });

        self.email.send_notification(&to, &subject, &body).await?;

        Ok(ActionOutput::Completed(Some(serde_json::json!({
            "sent_to": to,
            "subject": subject
        }))))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SendWhatsAppConfig {
    to: Option<String>,
    message: Option<String>,
}

/// Sends a WhatsApp text message. The recipient comes from the action
/// config, falling back to the payload's `phone` or `from` field.
pub struct SendWhatsAppHandler {
    pub messaging: Arc<dyn MessageSender>,
}

#[async_trait]
impl ActionHandler for SendWhatsAppHandler {
    async fn execute(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let cfg = decode_config::<SendWhatsAppConfig>(&ctx.config)?;

        let to = cfg
            .to
            .or_else(|| ctx.payload_str("phone"))
            .or_else(|| ctx.payload_str("from"))
            .ok_or_else(|| ActionError::BadConfig("no resolvable recipient phone".to_string()))?;

        let message = cfg
            .message
            .unwrap_or_else(|| format!("Automated message from workflow: {}", ctx.workflow_name));

        let message_id = self
            .messaging
            .send_message(&to, &message, MessageKind::Text)
            .await?;

        Ok(ActionOutput::Completed(Some(serde_json::json!({
            "message_id": message_id,
            "sent_to": to
        }))))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CreateTaskConfig {
    title: Option<String>,
    details: Option<serde_json::Value>,
}

/// Creates a task in the tenant's task list. Skips with a log entry while
/// no task collaborator is wired.
pub struct CreateTaskHandler {
    pub tasks: Option<Arc<dyn TaskSink>>,
}

#[async_trait]
impl ActionHandler for CreateTaskHandler {
    async fn execute(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let Some(tasks) = &self.tasks else {
            warn!(
                "Workflow {} requested CREATE_TASK but no task collaborator is configured",
                ctx.workflow_id
            );
            return Ok(ActionOutput::Skipped(
                "task collaborator not configured".to_string(),
            ));
        };

        let cfg = decode_config::<CreateTaskConfig>(&ctx.config)?;
        let title = cfg
            .title
            .unwrap_or_else(|| format!("Follow up: {}", ctx.trigger.as_str()));

        let task_id = tasks
            .create_task(TaskRequest {
                organization_id: ctx.organization_id,
                title,
                details: cfg.details.unwrap_or_else(|| ctx.payload.clone()),
            })
            .await?;

        Ok(ActionOutput::Completed(Some(serde_json::json!({
            "task_id": task_id
        }))))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct NotifyTeamConfig {
    message: Option<String>,
}

/// Notifies the organization's members. Skips with a log entry while no
/// notification collaborator is wired.
pub struct NotifyTeamHandler {
    pub team: Option<Arc<dyn TeamNotifier>>,
}

#[async_trait]
impl ActionHandler for NotifyTeamHandler {
    async fn execute(&self, ctx: &ActionContext) -> Result<ActionOutput, ActionError> {
        let Some(team) = &self.team else {
            warn!(
                "Workflow {} requested NOTIFY_TEAM but no notification collaborator is configured",
                ctx.workflow_id
            );
            return Ok(ActionOutput::Skipped(
                "notification collaborator not configured".to_string(),
            ));
        };

        let cfg = decode_config::<NotifyTeamConfig>(&ctx.config)?;
        let message = cfg.message.unwrap_or_else(|| {
            format!(
                "Workflow '{}' ran for event {}",
                ctx.workflow_name,
                ctx.trigger.as_str()
            )
        });

        team.notify_members(ctx.organization_id, &message).await?;

        Ok(ActionOutput::Completed(None))
    }
}

/// Interpret an opaque config payload as the handler's typed config.
///
/// `null` (an action stored without config) decodes to the defaults; any
/// other undecodable shape is a configuration error.
fn decode_config<T: serde::de::DeserializeOwned + Default>(
    config: &serde_json::Value,
) -> Result<T, ActionError> {
    if config.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(config.clone())
        .map_err(|e| ActionError::BadConfig(format!("could not interpret config: {}", e)))
}
