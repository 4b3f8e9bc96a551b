// WhatsApp messaging collaborator.
//
// Outbound sends are stubbed: the provider call is simulated with a short
// delay and a mock message id until the real Cloud API integration lands.
// Inbound webhook payloads are modeled so message-received events can be
// built from them.

use crate::config::WhatsAppConfig;
use crate::workflows::triggers::{Event, MessageData};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use uuid::Uuid;

/// Simulated provider round-trip for the stubbed sender.
const SIMULATED_LATENCY: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("invalid recipient number: {0}")]
    InvalidRecipient(String),
    #[error("messaging provider rejected the message: {0}")]
    Provider(String),
}

/// Kind of outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Template,
}

/// Outbound messaging collaborator (WhatsApp and compatible channels).
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a message and return the provider message id.
    async fn send_message(
        &self,
        to: &str,
        body: &str,
        kind: MessageKind,
    ) -> Result<String, MessageError>;
}

#[derive(Debug, Clone)]
pub struct WhatsAppService {
    phone_number_id: String,
}

impl WhatsAppService {
    pub fn new(config: &WhatsAppConfig) -> Self {
        if !config.is_configured() {
            warn!("WhatsApp sender is not configured; outbound messages will be simulated");
        }
        Self {
            phone_number_id: config.phone_number_id.clone(),
        }
    }
}

#[async_trait]
impl MessageSender for WhatsAppService {
    async fn send_message(
        &self,
        to: &str,
        body: &str,
        kind: MessageKind,
    ) -> Result<String, MessageError> {
        validate_phone(to)?;

        info!(
            "Sending {:?} WhatsApp message from {} to {}",
            kind, self.phone_number_id, to
        );

        // Simulated provider call
        sleep(SIMULATED_LATENCY).await;

        let message_id = format!("wamid.{}", Uuid::new_v4().simple());
        info!("WhatsApp message accepted: {} ({} chars)", message_id, body.len());
        Ok(message_id)
    }
}

/// Recipient numbers are E.164: leading `+`, 8 to 15 digits.
fn validate_phone(to: &str) -> Result<(), MessageError> {
    let digits = match to.strip_prefix('+') {
        Some(rest) => rest,
        None => return Err(MessageError::InvalidRecipient(to.to_string())),
    };

    if digits.len() < 8 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(MessageError::InvalidRecipient(to.to_string()));
    }

    Ok(())
}

// ===== Inbound webhook model =====

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    pub id: String,
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    pub value: WebhookChangeValue,
    pub field: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChangeValue {
    pub messaging_product: Option<String>,
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookMessage {
    pub from: String,
    pub id: String,
    pub timestamp: String,
    pub text: Option<WebhookText>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookText {
    pub body: String,
}

/// A text message received from a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub from: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Build the event a business operation fires when this message arrives.
    pub fn into_event(self, organization_id: Uuid) -> Event {
        Event::message_received(
            organization_id,
            MessageData {
                from: self.from,
                channel: "whatsapp".to_string(),
                body: self.body,
            },
        )
    }
}

/// Extract the text messages carried by an inbound webhook payload.
///
/// Non-text entries (statuses, media) are ignored; a missing or unparsable
/// timestamp falls back to the receive time.
pub fn extract_messages(payload: &WebhookPayload) -> Vec<InboundMessage> {
    let mut messages = Vec::new();

    for entry in &payload.entry {
        for change in &entry.changes {
            for msg in &change.value.messages {
                let Some(text) = &msg.text else { continue };

                let received_at = msg
                    .timestamp
                    .parse::<i64>()
                    .ok()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .unwrap_or_else(Utc::now);

                messages.push(InboundMessage {
                    from: msg.from.clone(),
                    body: text.body.clone(),
                    received_at,
                });
            }
        }
    }

    messages
}
