//! Domain layer for the game orchestration context.

pub mod choice;
pub mod commands;
pub mod config;
pub mod ending;
pub mod events;
pub mod game;
pub mod step;
pub mod var;
