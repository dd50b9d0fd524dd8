//! Command handlers for the game orchestration context.
//!
//! Each handler validates a player command against the current game, then
//! drives the domain operation. Events reach subscribers from inside the
//! domain call.

use branchline_core::command::Command;
use branchline_core::error::DomainError;
use branchline_core::rng::DeterministicRng;
use tracing::{info, instrument};

use crate::domain::choice::Choice;
use crate::domain::commands::{MakeChoice, UndoChoice};
use crate::domain::game::Game;

/// Handles the `MakeChoice` command: resolves the option on the current
/// step, rolling its risks, and appends the resulting choice.
///
/// # Errors
///
/// Returns `DomainError::GameOver` once the game has ended,
/// `DomainError::StepNotCurrent` if the command answers a different step,
/// or `DomainError::UnknownOption` if the option does not exist.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        game_id = %game.id(),
        correlation_id = %command.correlation_id,
        step = command.step_index,
        option = command.option_index
    )
)]
pub fn handle_make_choice(
    game: &mut Game,
    command: &MakeChoice,
    rng: &mut dyn DeterministicRng,
) -> Result<Choice, DomainError> {
    let choice = game.choose(command.step_index, command.option_index, rng)?;
    game.select(choice.clone(), command.correlation_id)?;

    if game.is_over() {
        info!(
            ending = game.end().map(|ending| ending.title()),
            "game over"
        );
    }
    Ok(choice)
}

/// Handles the `UndoChoice` command: removes the most recent choice.
///
/// Returns `Ok(None)` when there is nothing to undo.
///
/// # Errors
///
/// Returns the replay error if the remaining history no longer applies.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        game_id = %game.id(),
        correlation_id = %command.correlation_id
    )
)]
pub fn handle_undo_choice(
    game: &mut Game,
    command: &UndoChoice,
) -> Result<Option<Choice>, DomainError> {
    game.undo(command.correlation_id)
}
