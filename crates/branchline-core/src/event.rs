//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for routing.
    pub event_type: String,
    /// The game this event belongs to.
    pub game_id: Uuid,
    /// Per-game event counter, starting at 1 and increasing on every event.
    pub sequence_number: i64,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Causation ID linking this event to the command that caused it.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}

/// Receiver of published domain events.
///
/// Publication is fire-and-forget: a subscriber cannot fail the operation
/// that produced the event.
pub trait EventSubscriber<E: DomainEvent>: Send {
    /// Called once per published event.
    fn notify(&self, event: &E);
}

impl<E> EventSubscriber<E> for std::sync::mpsc::Sender<E>
where
    E: DomainEvent + Clone,
{
    fn notify(&self, event: &E) {
        // A dropped receiver only means nobody is listening any more.
        let _ = self.send(event.clone());
    }
}
