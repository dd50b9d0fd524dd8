//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Losing the game is not an error: a fired risk is recorded on the choice
/// and surfaced through the game's derived state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A variable name does not exist in the current variable set.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// A step index does not exist in the story.
    #[error("unknown step: {0}")]
    UnknownStep(usize),

    /// An option index does not exist on the given step.
    #[error("unknown option {option} on step {step}")]
    UnknownOption {
        /// The step that was addressed.
        step: usize,
        /// The option that was requested.
        option: usize,
    },

    /// A choice was requested on a step that is not the one presented.
    #[error("step {requested} is not the current step (current: {current})")]
    StepNotCurrent {
        /// The step the caller tried to choose on.
        requested: usize,
        /// The step currently presented.
        current: usize,
    },

    /// The presented step already has a recorded choice.
    #[error("step {0} has already been answered")]
    StepAlreadyAnswered(usize),

    /// The game is over, so there is no current step.
    #[error("no current step: the game is over")]
    NoCurrentStep,

    /// The game is over and accepts no further choices.
    #[error("the game is over")]
    GameOver,

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
