//! The authored story model.
//!
//! Enumerated fields (`Condition`) use the single-key-map representation in
//! both YAML and JSON, so the same document shape works for either format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::value::{Value, VarName};
use crate::error::ContentError;

/// A complete authored story: variables, steps and endings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDefinition {
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Tracked variables keyed by name.
    #[serde(default)]
    pub vars: BTreeMap<VarName, VarDefinition>,
    /// Decision points in play order.
    pub steps: Vec<StepDefinition>,
    /// Endings in authoring order.
    #[serde(default)]
    pub endings: Vec<EndingDefinition>,
}

impl StoryDefinition {
    /// Checks that every variable reference resolves.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Invalid` listing every problem found.
    pub fn validate(&self) -> Result<(), ContentError> {
        crate::application::validation::validate(self)
    }
}

/// Definition of one tracked variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDefinition {
    /// Value before any choice is made.
    pub value: Value,
    /// Free-form category, e.g. `risk`.
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the variable is shown to the player.
    #[serde(default)]
    pub public: bool,
}

/// Definition of one decision point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Display year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Short heading.
    #[serde(default)]
    pub title: Option<String>,
    /// Narrative body.
    #[serde(default)]
    pub text: Option<String>,
    /// Whether the step can be reached given the current variables.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub assert: Condition,
    /// Options offered to the player.
    #[serde(default)]
    pub options: Vec<OptionDefinition>,
}

/// One option the player may pick on a step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionDefinition {
    /// Button text.
    pub label: String,
    /// New values assigned when the option is picked.
    #[serde(default)]
    pub changes: BTreeMap<VarName, Value>,
    /// Losing consequences this option may trigger.
    #[serde(default)]
    pub risks: Vec<RiskDefinition>,
    /// Text shown to the player after picking.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// A losing consequence an option may trigger.
///
/// The risk fires when `when` holds after the option's changes are applied
/// and a roll in `[0, 1)` falls below `odds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDefinition {
    /// The variable recorded as the consequence; endings key on it.
    pub var: VarName,
    /// Gate evaluated against the post-change variables.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub when: Condition,
    /// Probability of firing once the gate holds.
    #[serde(default = "certain")]
    pub odds: f64,
}

fn certain() -> f64 {
    1.0
}

/// A terminal narrative payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EndingDefinition {
    /// Heading.
    pub title: String,
    /// Narrative body.
    #[serde(default)]
    pub text: Option<String>,
    /// Consequence variable that selects this ending. `None` marks a
    /// fallback ending.
    #[serde(default)]
    pub trigger: Option<VarName>,
}
