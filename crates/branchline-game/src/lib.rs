//! Branchline — game orchestration.
//!
//! A [`Game`](domain::game::Game) owns the log of choices the player has
//! made. Variable values, the journey through the steps, whether the game is
//! over, and which ending applies are all derived from that log on every
//! read. Undo pops the log and replays it from scratch.

pub mod application;
pub mod domain;

pub use domain::choice::{Changes, Choice};
pub use domain::config::{GameConfig, GameOverPolicy};
pub use domain::ending::Ending;
pub use domain::events::{GameEvent, GameEventKind};
pub use domain::game::Game;
pub use domain::step::Step;
pub use domain::var::{RISK_CATEGORY, Var, Vars};
