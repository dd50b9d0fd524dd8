//! Game configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// When the game counts as over.
///
/// Both rules treat a fired consequence as the end. They differ on a story
/// that simply runs out of reachable steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverPolicy {
    /// Only a recorded consequence ends the game.
    ConsequencesOnly,
    /// A recorded consequence, or no valid step left ahead, ends the game.
    #[default]
    ConsequencesOrExhausted,
}

impl GameOverPolicy {
    /// The `snake_case` name used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConsequencesOnly => "consequences_only",
            Self::ConsequencesOrExhausted => "consequences_or_exhausted",
        }
    }
}

impl fmt::Display for GameOverPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameOverPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consequences_only" => Ok(Self::ConsequencesOnly),
            "consequences_or_exhausted" => Ok(Self::ConsequencesOrExhausted),
            other => Err(format!(
                "unknown game-over policy `{other}` (expected consequences_only or consequences_or_exhausted)"
            )),
        }
    }
}

/// Tunables for a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game-over rule.
    #[serde(default)]
    pub game_over: GameOverPolicy,
}
