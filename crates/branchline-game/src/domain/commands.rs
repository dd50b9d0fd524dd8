//! Commands for the game orchestration context.

use branchline_core::command::Command;
use uuid::Uuid;

/// Command to pick an option on the current step.
#[derive(Debug, Clone)]
pub struct MakeChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The step the player is answering.
    pub step_index: usize,
    /// The option picked on that step.
    pub option_index: usize,
}

impl Command for MakeChoice {
    fn command_type(&self) -> &'static str {
        "game.make_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to take back the most recent choice.
#[derive(Debug, Clone)]
pub struct UndoChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for UndoChoice {
    fn command_type(&self) -> &'static str {
        "game.undo_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
