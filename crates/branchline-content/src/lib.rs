//! Branchline — story content.
//!
//! Authored stories are plain YAML or JSON documents. This crate owns their
//! serde model, parses them, checks that every variable they reference is
//! defined, and fingerprints the source so a replay can be tied to the exact
//! content it was played against.

pub mod application;
pub mod domain;
pub mod error;

pub use application::loader::{
    LoadedStory, StoryFormat, load_story, load_story_from_str, parse_story_json,
    parse_story_yaml, version_hash,
};
pub use domain::condition::{Comparison, Condition};
pub use domain::story::{
    EndingDefinition, OptionDefinition, RiskDefinition, StepDefinition, StoryDefinition,
    VarDefinition,
};
pub use domain::value::{Value, VarName};
pub use error::ContentError;
