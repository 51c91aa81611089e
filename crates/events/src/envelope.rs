use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Event;

/// Envelope for an event, containing stream metadata.
///
/// This is the unit published on a bus.
///
/// Notes:
/// - `aggregate_id` is the string identity of the aggregate that recorded the event.
/// - `sequence_number` is the aggregate version the event was published at; it is
///   monotonically increasing per aggregate, though several events may share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    message_id: Uuid,

    aggregate_type: String,
    aggregate_id: String,

    sequence_number: u64,
    published_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        message_id: Uuid,
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        sequence_number: u64,
        published_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            message_id,
            aggregate_type: aggregate_type.into(),
            aggregate_id: aggregate_id.into(),
            sequence_number,
            published_at,
            payload,
        }
    }

    /// Wrap a payload with a fresh UUIDv7 message id, stamped now.
    pub fn wrap(
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self::new(
            Uuid::now_v7(),
            aggregate_type,
            aggregate_id,
            sequence_number,
            Utc::now(),
            payload,
        )
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
