//! Replays a path of option picks through a fresh game.

use std::sync::Arc;
use std::sync::mpsc;

use branchline_content::StoryDefinition;
use branchline_core::clock::Clock;
use branchline_core::error::DomainError;
use branchline_core::event::DomainEvent;
use branchline_core::rng::DeterministicRng;
use branchline_game::application::command_handlers::{handle_make_choice, handle_undo_choice};
use branchline_game::application::query_handlers::{GameView, get_game_view};
use branchline_game::domain::commands::{MakeChoice, UndoChoice};
use branchline_game::{Game, GameConfig, GameEvent, GameEventKind};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;

/// What to play.
#[derive(Debug, Clone, Default)]
pub struct ReplayPlan {
    /// Option picks, one per presented step.
    pub path: Vec<usize>,
    /// Picks to take back afterwards.
    pub undo: usize,
    /// Game tunables.
    pub config: GameConfig,
}

/// Summary of one published event.
#[derive(Debug, Serialize)]
pub struct EventRecord {
    /// Event type name.
    pub event_type: &'static str,
    /// Per-game event counter.
    pub sequence_number: i64,
    /// History length after the event.
    pub history_len: usize,
    /// Serialized payload.
    pub payload: serde_json::Value,
}

impl EventRecord {
    fn from_event(event: &GameEvent) -> Self {
        Self {
            event_type: event.event_type(),
            sequence_number: event.metadata().sequence_number,
            history_len: match &event.kind {
                GameEventKind::ChoiceSelected(payload) => payload.history_len,
                GameEventKind::ChoiceUndone(payload) => payload.history_len,
            },
            payload: event.to_payload(),
        }
    }
}

/// Result of a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    /// Fingerprint of the story source, when known.
    pub version_hash: Option<String>,
    /// Derived state after the last pick and undo.
    pub view: GameView,
    /// Events published during the replay, in order.
    pub events: Vec<EventRecord>,
}

/// Plays `plan` on a new game built from `story`.
///
/// Each pick answers whichever step is presented at that point, so the path
/// follows gated steps the same way a player would.
///
/// # Errors
///
/// Returns `AppError::Config` if `plan.undo` exceeds the number of picks,
/// or `AppError::Domain` if a pick is rejected. A pick left over once the
/// game has ended is reported as `DomainError::GameOver`.
#[instrument(skip_all, fields(picks = plan.path.len(), undo = plan.undo))]
pub fn replay(
    story: StoryDefinition,
    plan: &ReplayPlan,
    clock: Arc<dyn Clock>,
    rng: &mut dyn DeterministicRng,
) -> Result<(Game, Vec<GameEvent>), AppError> {
    if plan.undo > plan.path.len() {
        return Err(AppError::Config(format!(
            "cannot undo {} picks out of {}",
            plan.undo,
            plan.path.len()
        )));
    }

    let mut game = Game::new(story, plan.config, clock);
    let (sender, receiver) = mpsc::channel::<GameEvent>();
    game.subscribe(Box::new(sender));

    for &option_index in &plan.path {
        let command = MakeChoice {
            correlation_id: Uuid::new_v4(),
            step_index: game.step_index().map_err(|_| DomainError::GameOver)?,
            option_index,
        };
        handle_make_choice(&mut game, &command, rng)?;
    }

    for _ in 0..plan.undo {
        let command = UndoChoice {
            correlation_id: Uuid::new_v4(),
        };
        handle_undo_choice(&mut game, &command)?;
    }

    let events: Vec<GameEvent> = receiver.try_iter().collect();
    info!(
        history = game.history().len(),
        over = game.is_over(),
        events = events.len(),
        "replay finished"
    );
    Ok((game, events))
}

/// Builds the printable report for a finished replay.
#[must_use]
pub fn report(game: &Game, events: &[GameEvent], version_hash: Option<String>) -> ReplayReport {
    ReplayReport {
        version_hash,
        view: get_game_view(game),
        events: events.iter().map(EventRecord::from_event).collect(),
    }
}
