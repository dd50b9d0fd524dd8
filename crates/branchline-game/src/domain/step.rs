//! Decision points.

use branchline_content::{Condition, OptionDefinition, StepDefinition};

use super::var::Vars;

/// One decision point in the authored sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    index: usize,
    year: Option<i32>,
    title: Option<String>,
    text: Option<String>,
    assert: Condition,
    options: Vec<OptionDefinition>,
}

impl Step {
    /// Wraps an authored step at its position in the story.
    #[must_use]
    pub fn from_definition(index: usize, definition: StepDefinition) -> Self {
        Self {
            index,
            year: definition.year,
            title: definition.title,
            text: definition.text,
            assert: definition.assert,
            options: definition.options,
        }
    }

    /// Whether the step can be reached given `vars`.
    #[must_use]
    pub fn assert(&self, vars: &Vars) -> bool {
        vars.holds(&self.assert)
    }

    /// Zero-based position in the story.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Display year.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Heading.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Narrative body.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Options offered to the player.
    #[must_use]
    pub fn options(&self) -> &[OptionDefinition] {
        &self.options
    }

    /// A single option by index.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&OptionDefinition> {
        self.options.get(index)
    }
}
