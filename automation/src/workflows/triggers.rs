// Workflow Triggers - Event types that can trigger workflow execution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Business events that workflows can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    NewLead,
    NewBooking,
    MessageReceived,
    LeadStageChanged,
    BookingConfirmed,
    BookingCancelled,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewLead => "NEW_LEAD",
            Self::NewBooking => "NEW_BOOKING",
            Self::MessageReceived => "MESSAGE_RECEIVED",
            Self::LeadStageChanged => "LEAD_STAGE_CHANGED",
            Self::BookingConfirmed => "BOOKING_CONFIRMED",
            Self::BookingCancelled => "BOOKING_CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW_LEAD" => Some(Self::NewLead),
            "NEW_BOOKING" => Some(Self::NewBooking),
            "MESSAGE_RECEIVED" => Some(Self::MessageReceived),
            "LEAD_STAGE_CHANGED" => Some(Self::LeadStageChanged),
            "BOOKING_CONFIRMED" => Some(Self::BookingConfirmed),
            "BOOKING_CANCELLED" => Some(Self::BookingCancelled),
            _ => None,
        }
    }
}

/// An event fired by a business operation.
///
/// Events are ephemeral: consumed once by the engine, never persisted or
/// replayed by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    pub organization_id: Uuid,
    pub trigger: TriggerType,
    pub data: EventData,
    pub occurred_at: DateTime<Utc>,
}

/// Payload carried by an event, keyed by event family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventData {
    Lead(LeadData),
    Booking(BookingData),
    Message(MessageData),
    StageChange(StageChangeData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadData {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingData {
    pub id: Uuid,
    pub customer_name: String,
    pub service: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageData {
    pub from: String,
    pub channel: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageChangeData {
    pub lead_id: Uuid,
    pub lead_name: Option<String>,
    pub old_stage: String,
    pub new_stage: String,
}

impl Event {
    fn new(organization_id: Uuid, trigger: TriggerType, data: EventData) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            organization_id,
            trigger,
            data,
            occurred_at: Utc::now(),
        }
    }

    /// Create a new-lead event
    pub fn new_lead(organization_id: Uuid, lead: LeadData) -> Self {
        Self::new(organization_id, TriggerType::NewLead, EventData::Lead(lead))
    }

    /// Create a new-booking event
    pub fn new_booking(organization_id: Uuid, booking: BookingData) -> Self {
        Self::new(
            organization_id,
            TriggerType::NewBooking,
            EventData::Booking(booking),
        )
    }

    /// Create a booking-confirmed event
    pub fn booking_confirmed(organization_id: Uuid, booking: BookingData) -> Self {
        Self::new(
            organization_id,
            TriggerType::BookingConfirmed,
            EventData::Booking(booking),
        )
    }

    /// Create a booking-cancelled event
    pub fn booking_cancelled(organization_id: Uuid, booking: BookingData) -> Self {
        Self::new(
            organization_id,
            TriggerType::BookingCancelled,
            EventData::Booking(booking),
        )
    }

    /// Create a lead-stage-changed event
    pub fn lead_stage_changed(organization_id: Uuid, change: StageChangeData) -> Self {
        Self::new(
            organization_id,
            TriggerType::LeadStageChanged,
            EventData::StageChange(change),
        )
    }

    /// Create a message-received event
    pub fn message_received(organization_id: Uuid, message: MessageData) -> Self {
        Self::new(
            organization_id,
            TriggerType::MessageReceived,
            EventData::Message(message),
        )
    }

    /// Flatten the event data for template substitution and handlers.
    pub fn payload_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.data).unwrap_or(serde_json::Value::Null)
    }
}
