// Workflow Store - Read-only access to tenant automation definitions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::actions::Action;
use super::triggers::TriggerType;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A tenant-scoped automation definition.
///
/// Read-only from this subsystem's perspective: definitions are created and
/// edited through the management surface elsewhere in the platform.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub trigger: TriggerType,
    pub actions: Vec<Action>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lookup boundary for automation definitions.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// All active workflows for the tenant and trigger, in execution order.
    ///
    /// Implementations must filter by exact tenant and trigger match and
    /// `is_active = true`.
    async fn find_active(
        &self,
        organization_id: Uuid,
        trigger: TriggerType,
    ) -> Result<Vec<Workflow>, StoreError>;
}

/// Postgres-backed store. Workflows are returned in creation order, which
/// is the documented execution order when several match one event.
#[derive(Debug, Clone)]
pub struct PgWorkflowStore {
    pool: PgPool,
}

impl PgWorkflowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type WorkflowRow = (
    Uuid,
    Uuid,
    String,
    String,
    serde_json::Value,
    bool,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

#[async_trait]
impl WorkflowStore for PgWorkflowStore {
    async fn find_active(
        &self,
        organization_id: Uuid,
        trigger: TriggerType,
    ) -> Result<Vec<Workflow>, StoreError> {
        let rows = sqlx::query_as::<_, WorkflowRow>(
            r#"
            SELECT
                id, organization_id, name, trigger, actions,
                is_active, created_at, updated_at
            FROM workflows
            WHERE organization_id = $1
              AND trigger = $2
              AND is_active = true
            ORDER BY created_at ASC
            "#,
        )
        .bind(organization_id)
        .bind(trigger.as_str())
        .fetch_all(&self.pool)
        .await?;

        let workflows = rows
            .into_iter()
            .filter_map(|row| {
                let Some(trigger) = TriggerType::parse(&row.3) else {
                    warn!("Workflow {} has unrecognized trigger '{}', ignoring", row.0, row.3);
                    return None;
                };

                Some(Workflow {
                    id: row.0,
                    organization_id: row.1,
                    name: row.2,
                    trigger,
                    actions: decode_actions(row.0, &row.4),
                    is_active: row.5,
                    created_at: row.6,
                    updated_at: row.7,
                })
            })
            .collect();

        Ok(workflows)
    }
}

/// Decode a stored action list, dropping malformed entries.
///
/// A value that is not an array decodes to an empty list; entries that do
/// not carry a recognizable kind are skipped with a warning so the
/// well-formed remainder still executes.
pub fn decode_actions(workflow_id: Uuid, value: &serde_json::Value) -> Vec<Action> {
    let Some(entries) = value.as_array() else {
        warn!(
            "Workflow {} actions are not a list ({}), treating as empty",
            workflow_id, value
        );
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<Action>(entry.clone()) {
            Ok(action) => Some(action),
            Err(e) => {
                warn!(
                    "Workflow {} has malformed action entry {}: {}",
                    workflow_id, entry, e
                );
                None
            }
        })
        .collect()
}
