//! Application layer for the game orchestration context.

pub mod command_handlers;
pub mod query_handlers;
