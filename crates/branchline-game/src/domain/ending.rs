//! Terminal narrative payloads.

use branchline_content::{EndingDefinition, VarName};

/// An ending, optionally keyed on a consequence variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Ending {
    title: String,
    text: Option<String>,
    trigger: Option<VarName>,
}

impl Ending {
    /// Wraps an authored ending.
    #[must_use]
    pub fn from_definition(definition: EndingDefinition) -> Self {
        Self {
            title: definition.title,
            text: definition.text,
            trigger: definition.trigger,
        }
    }

    /// Whether the ending is keyed on a variable. Endings without a
    /// condition are fallbacks.
    #[must_use]
    pub fn has_condition(&self) -> bool {
        self.trigger.is_some()
    }

    /// The variable this ending is keyed on.
    #[must_use]
    pub fn trigger(&self) -> Option<&VarName> {
        self.trigger.as_ref()
    }

    /// Heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Narrative body.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
