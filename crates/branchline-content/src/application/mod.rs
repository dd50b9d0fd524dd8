//! Application layer for story content: parsing, loading and validation.

pub mod loader;
pub mod validation;
