//! Workflow/event automation for the Atrium back-office platform.
//!
//! Business operations elsewhere in the platform fire events (a lead was
//! created, a booking was confirmed, a message arrived) through
//! [`workflows::AutomationEngine`]. The engine looks up the tenant's active
//! workflow definitions for that trigger and runs each workflow's ordered
//! action list against the configured collaborators: email, WhatsApp
//! messaging, task creation, team notification.
//!
//! Firing is best-effort by contract: it never blocks the caller and never
//! surfaces an error to it. Failures are isolated per action, logged, and
//! counted in [`services::AutomationMetrics`].
//!
//! # Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use atrium_automation::config::Config;
//! use atrium_automation::database;
//! use atrium_automation::services::{PgFeatureGate, SmtpEmailService, WhatsAppService};
//! use atrium_automation::workflows::triggers::LeadData;
//! use atrium_automation::workflows::{ActionRegistry, AutomationEngine, PgWorkflowStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pool = database::create_pool(&config.database_url).await?;
//!
//!     let registry = ActionRegistry::with_defaults(
//!         Arc::new(SmtpEmailService::new(&config.smtp)),
//!         Arc::new(WhatsAppService::new(&config.whatsapp)),
//!         None,
//!         None,
//!     );
//!
//!     let engine = AutomationEngine::new(
//!         Arc::new(PgWorkflowStore::new(pool.clone())),
//!         registry,
//!         config.execution.clone(),
//!     )
//!     .with_feature_gate(Arc::new(PgFeatureGate::new(pool)));
//!
//!     engine.fire_new_lead(
//!         uuid::Uuid::new_v4(),
//!         LeadData {
//!             id: uuid::Uuid::new_v4(),
//!             name: "Ada".to_string(),
//!             email: Some("ada@example.com".to_string()),
//!             phone: None,
//!             source: Some("chat-widget".to_string()),
//!             stage: None,
//!         },
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod services;
pub mod workflows;

pub use error::ActionError;
pub use workflows::{AutomationEngine, Event, TriggerType, WorkflowRunSummary};

/// Display name used in outbound notifications.
pub const APP_NAME: &str = "Atrium Suite";

#[cfg(test)]
mod tests;
