// Plan/feature gating. The automation engine consumes this as a boolean
// oracle: does the tenant's subscription include workflow automation?

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Subscription tiers offered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    Starter,
    Growth,
    Premium,
    Agency,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "STARTER",
            Self::Growth => "GROWTH",
            Self::Premium => "PREMIUM",
            Self::Agency => "AGENCY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STARTER" => Some(Self::Starter),
            "GROWTH" => Some(Self::Growth),
            "PREMIUM" => Some(Self::Premium),
            "AGENCY" => Some(Self::Agency),
            _ => None,
        }
    }

    /// Whether the plan includes workflow automation.
    pub fn automation_enabled(&self) -> bool {
        match self {
            Self::Starter => false,
            Self::Growth | Self::Premium | Self::Agency => true,
        }
    }
}

/// Boolean oracle consulted before running a tenant's automations.
#[async_trait]
pub trait FeatureGate: Send + Sync {
    async fn automation_enabled(&self, organization_id: Uuid) -> Result<bool, GateError>;
}

/// Gate backed by the tenant's subscription row.
#[derive(Debug, Clone)]
pub struct PgFeatureGate {
    pool: PgPool,
}

impl PgFeatureGate {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureGate for PgFeatureGate {
    async fn automation_enabled(&self, organization_id: Uuid) -> Result<bool, GateError> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT plan, status FROM subscriptions WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((plan, status)) = row else {
            return Ok(false);
        };

        if status != "ACTIVE" {
            return Ok(false);
        }

        match SubscriptionPlan::parse(&plan) {
            Some(plan) => Ok(plan.automation_enabled()),
            None => {
                warn!(
                    "Unknown subscription plan '{}' for organization {}",
                    plan, organization_id
                );
                Ok(false)
            }
        }
    }
}
