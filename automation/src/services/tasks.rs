// Task-creation and team-notification collaborators.
//
// No production implementation ships yet; the action handlers treat a
// missing collaborator as skip-with-log. The traits define the boundary a
// real task system or notification fan-out plugs into.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task store rejected the task: {0}")]
    Rejected(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// A task to be created in the tenant's task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub organization_id: Uuid,
    pub title: String,
    /// Free-form context for the task, typically the triggering event's
    /// payload.
    pub details: serde_json::Value,
}

/// Task-management collaborator.
#[async_trait]
pub trait TaskSink: Send + Sync {
    /// Create a task and return its id.
    async fn create_task(&self, request: TaskRequest) -> Result<Uuid, TaskError>;
}

/// Team-notification collaborator.
#[async_trait]
pub trait TeamNotifier: Send + Sync {
    /// Notify the members of an organization.
    async fn notify_members(&self, organization_id: Uuid, message: &str)
        -> Result<(), NotifyError>;
}
