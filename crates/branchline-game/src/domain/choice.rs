//! Records of decisions the player has made.

use std::collections::BTreeMap;

use branchline_content::{Value, VarName};
use branchline_core::error::DomainError;
use branchline_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

use super::step::Step;
use super::var::Vars;

/// New values keyed by variable name.
pub type Changes = BTreeMap<VarName, Value>;

/// An immutable record of one decision.
///
/// Risk rolls happen once, when the choice is resolved; the consequences
/// that fired are stored here so replaying history never rolls again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    step: usize,
    option: Option<usize>,
    changes: Changes,
    consequences: Vec<VarName>,
    feedback: Option<String>,
}

impl Choice {
    /// Creates a choice made on `step` with no consequences.
    #[must_use]
    pub fn new(step: usize, changes: Changes) -> Self {
        Self {
            step,
            option: None,
            changes,
            consequences: Vec::new(),
            feedback: None,
        }
    }

    /// Records which option of the step produced this choice.
    #[must_use]
    pub fn with_option(mut self, option: usize) -> Self {
        self.option = Some(option);
        self
    }

    /// Records consequences that fired. Duplicates are dropped.
    #[must_use]
    pub fn with_consequences(mut self, consequences: impl IntoIterator<Item = VarName>) -> Self {
        for consequence in consequences {
            if !self.consequences.contains(&consequence) {
                self.consequences.push(consequence);
            }
        }
        self
    }

    /// Attaches feedback text for the player.
    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Resolves option `option_index` of `step` into a choice.
    ///
    /// The option's changes are previewed on a copy of `vars`. Each risk
    /// whose gate holds on the preview is rolled against its odds; certain
    /// risks (`odds >= 1`) and impossible ones (`odds <= 0`) never consult
    /// `rng`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownOption` if the step has no such option,
    /// or `DomainError::UnknownVariable` if the option changes a variable
    /// that does not exist.
    pub fn resolve(
        step: &Step,
        option_index: usize,
        vars: &Vars,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Self, DomainError> {
        let option = step
            .option(option_index)
            .ok_or(DomainError::UnknownOption {
                step: step.index(),
                option: option_index,
            })?;

        let mut preview = vars.clone();
        preview.update(&option.changes)?;

        let mut fired = Vec::new();
        for risk in &option.risks {
            if !preview.holds(&risk.when) {
                continue;
            }
            let hit = if risk.odds >= 1.0 {
                true
            } else if risk.odds <= 0.0 {
                false
            } else {
                rng.next_f64() < risk.odds
            };
            if hit {
                fired.push(risk.var.clone());
            }
        }

        let mut choice = Self::new(step.index(), option.changes.clone())
            .with_option(option_index)
            .with_consequences(fired);
        if let Some(feedback) = &option.feedback {
            choice = choice.with_feedback(feedback.clone());
        }
        Ok(choice)
    }

    /// The step this choice was made on.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// The option picked, when the choice came from authored content.
    #[must_use]
    pub fn option(&self) -> Option<usize> {
        self.option
    }

    /// The variable changes this choice applies.
    #[must_use]
    pub fn changes(&self) -> &Changes {
        &self.changes
    }

    /// Consequence tags, in the order they fired.
    #[must_use]
    pub fn consequences(&self) -> &[VarName] {
        &self.consequences
    }

    /// Whether any consequence fired.
    #[must_use]
    pub fn has_consequences(&self) -> bool {
        !self.consequences.is_empty()
    }

    /// Whether taking this choice lost the game.
    #[must_use]
    pub fn take_risks(&self) -> bool {
        self.has_consequences()
    }

    /// Feedback text, if any.
    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Whether the choice carries feedback.
    #[must_use]
    pub fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }
}
