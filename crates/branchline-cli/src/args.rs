//! Command line arguments.

use std::path::PathBuf;

use branchline_game::{GameConfig, GameOverPolicy};
use clap::Parser;

/// Replays a path of option picks through a Branchline story and prints the
/// resulting game view as JSON.
#[derive(Debug, Clone, Parser)]
#[command(name = "branchline", version, about)]
pub struct Args {
    /// Story file (`.yaml`, `.yml` or `.json`).
    #[arg(env = "BRANCHLINE_STORY")]
    pub story: PathBuf,

    /// Option picks, one per step, e.g. `0,1,0`.
    #[arg(long, env = "BRANCHLINE_PATH", value_delimiter = ',')]
    pub path: Vec<usize>,

    /// Number of picks to take back after replaying the path.
    #[arg(long, env = "BRANCHLINE_UNDO", default_value_t = 0)]
    pub undo: usize,

    /// Seed for risk rolls. Omit for an entropy-seeded run.
    #[arg(long, env = "BRANCHLINE_SEED")]
    pub seed: Option<u64>,

    /// When the game counts as over.
    #[arg(
        long = "game-over",
        env = "BRANCHLINE_GAME_OVER",
        default_value_t = GameOverPolicy::default()
    )]
    pub game_over: GameOverPolicy,

    /// Emit logs as JSON lines.
    #[arg(long, env = "BRANCHLINE_LOG_JSON")]
    pub json: bool,
}

impl Args {
    /// The game configuration these arguments describe.
    #[must_use]
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            game_over: self.game_over,
        }
    }
}
