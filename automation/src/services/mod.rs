// Collaborator services consumed by workflow actions. Every collaborator
// is a trait so the engine can be assembled with test doubles or future
// real integrations.

pub mod email;
pub mod gating;
pub mod metrics;
pub mod tasks;
pub mod voice;
pub mod whatsapp;

pub use email::{EmailSender, SmtpEmailService};
pub use gating::{FeatureGate, PgFeatureGate, SubscriptionPlan};
pub use metrics::{AutomationMetrics, MetricsSnapshot};
pub use tasks::{TaskRequest, TaskSink, TeamNotifier};
pub use voice::{VoiceCaller, VoiceService};
pub use whatsapp::{MessageKind, MessageSender, WhatsAppService};
