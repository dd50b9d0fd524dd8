//! Domain events for the game orchestration context.

use branchline_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::choice::Choice;

/// Event type name for [`ChoiceSelected`].
pub const CHOICE_SELECTED_EVENT_TYPE: &str = "game.choice_selected";
/// Event type name for [`ChoiceUndone`].
pub const CHOICE_UNDONE_EVENT_TYPE: &str = "game.choice_undone";

/// Emitted after a choice is appended to the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceSelected {
    /// The game the choice was made in.
    pub game_id: Uuid,
    /// History length after the choice was appended.
    pub history_len: usize,
    /// The applied choice.
    pub choice: Choice,
}

/// Emitted after the last choice is removed from the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceUndone {
    /// The game the choice was removed from.
    pub game_id: Uuid,
    /// History length after the choice was removed.
    pub history_len: usize,
    /// The removed choice.
    pub choice: Choice,
}

/// Event payload variants for the game orchestration context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A choice was selected.
    ChoiceSelected(ChoiceSelected),
    /// A choice was undone.
    ChoiceUndone(ChoiceUndone),
}

/// Domain event envelope for the game orchestration context.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl GameEvent {
    /// The choice carried by the event.
    #[must_use]
    pub fn choice(&self) -> &Choice {
        match &self.kind {
            GameEventKind::ChoiceSelected(payload) => &payload.choice,
            GameEventKind::ChoiceUndone(payload) => &payload.choice,
        }
    }
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            GameEventKind::ChoiceSelected(_) => CHOICE_SELECTED_EVENT_TYPE,
            GameEventKind::ChoiceUndone(_) => CHOICE_UNDONE_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
