//! Branchline CLI — error types.

use branchline_content::ContentError;
use branchline_core::error::DomainError;
use thiserror::Error;

/// Errors raised while replaying a story from the command line.
#[derive(Debug, Error)]
pub enum AppError {
    /// An argument or environment variable is missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The story could not be loaded.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The game rejected a pick or an undo.
    #[error("game error: {0}")]
    Domain(#[from] DomainError),

    /// The report could not be written.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Content(_) => "content_error",
            Self::Domain(DomainError::GameOver) => "game_over",
            Self::Domain(DomainError::UnknownOption { .. }) => "unknown_option",
            Self::Domain(DomainError::StepAlreadyAnswered(_)) => "step_already_answered",
            Self::Domain(_) => "domain_error",
            Self::Output(_) => "output_error",
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Content(_) => 3,
            Self::Domain(_) => 4,
            Self::Output(_) => 5,
        }
    }
}
