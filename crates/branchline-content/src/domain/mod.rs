//! Domain layer for story content.

pub mod condition;
pub mod story;
pub mod value;
