// Workflow Actions - Action descriptors and per-action outcomes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of actions a workflow can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    SendEmail,
    SendWhatsapp,
    CreateTask,
    NotifyTeam,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendEmail => "SEND_EMAIL",
            Self::SendWhatsapp => "SEND_WHATSAPP",
            Self::CreateTask => "CREATE_TASK",
            Self::NotifyTeam => "NOTIFY_TEAM",
        }
    }
}

/// A single step in a workflow's ordered action list.
///
/// The configuration payload is opaque here; the handler registered for the
/// kind extracts what it needs. String values may carry `{{field}}`
/// placeholders resolved against the event payload before dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl Action {
    pub fn new(kind: ActionKind, config: serde_json::Value) -> Self {
        Self { kind, config }
    }

    // ===== Builders =====

    pub fn send_email(to: &str, subject: &str, body: &str) -> Self {
        Self::new(
            ActionKind::SendEmail,
            serde_json::json!({
                "to": to,
                "subject": subject,
                "body": body
            }),
        )
    }

    pub fn send_whatsapp(to: &str, message: &str) -> Self {
        Self::new(
            ActionKind::SendWhatsapp,
            serde_json::json!({
                "to": to,
                "message": message
            }),
        )
    }

    pub fn create_task(title: &str) -> Self {
        Self::new(ActionKind::CreateTask, serde_json::json!({ "title": title }))
    }

    pub fn notify_team(message: &str) -> Self {
        Self::new(
            ActionKind::NotifyTeam,
            serde_json::json!({ "message": message }),
        )
    }
}

/// Terminal state of one action dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Completed,
    Failed,
    Skipped,
}

/// Record of one action dispatch, kept for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub status: ActionStatus,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
    pub duration_ms: i64,
}

impl ActionOutcome {
    pub fn completed(kind: ActionKind, output: Option<serde_json::Value>) -> Self {
        Self {
            kind,
            status: ActionStatus::Completed,
            output,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn failed(kind: ActionKind, error: impl Into<String>) -> Self {
        Self {
            kind,
            status: ActionStatus::Failed,
            output: None,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    pub fn skipped(kind: ActionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            status: ActionStatus::Skipped,
            output: None,
            error: Some(reason.into()),
            duration_ms: 0,
        }
    }

    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Aggregate result of running one workflow against one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunSummary {
    pub workflow_id: Uuid,
    pub workflow_name: String,
    pub outcomes: Vec<ActionOutcome>,
}

impl WorkflowRunSummary {
    pub fn completed(&self) -> usize {
        self.count(ActionStatus::Completed)
    }

    pub fn failed(&self) -> usize {
        self.count(ActionStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(ActionStatus::Skipped)
    }

    fn count(&self, status: ActionStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}
