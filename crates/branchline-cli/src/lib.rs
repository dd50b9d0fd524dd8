//! Branchline command line replay tool.
//!
//! Loads a story, plays a path of option picks through it and reports the
//! derived game state.

pub mod args;
pub mod error;
pub mod replay;
