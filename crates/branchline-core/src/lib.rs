//! Branchline Core — shared domain abstractions.
//!
//! This crate defines the error type, determinism seams (clock and RNG),
//! and the command/event vocabulary that the game and content crates build
//! on. It contains no story logic.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod rng;
