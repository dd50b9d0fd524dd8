//! Tracked variables.

use std::collections::{BTreeMap, HashMap};

use branchline_content::{Condition, Value, VarDefinition, VarName};
use branchline_core::error::DomainError;
use serde::Serialize;

use super::choice::Changes;

/// Category carried by variables that feed losing consequences.
pub const RISK_CATEGORY: &str = "risk";

/// A named tracked value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Var {
    name: VarName,
    value: Value,
    category: Option<String>,
    public: bool,
}

impl Var {
    /// Creates a variable at its defined initial value.
    #[must_use]
    pub fn from_definition(name: VarName, definition: &VarDefinition) -> Self {
        Self {
            name,
            value: definition.value,
            category: definition.category.clone(),
            public: definition.public,
        }
    }

    /// Assigns a new value.
    pub fn update(&mut self, value: Value) {
        self.value = value;
    }

    /// The variable's name.
    #[must_use]
    pub fn name(&self) -> &VarName {
        &self.name
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.value
    }

    /// The free-form category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether the variable is shown to the player.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Whether the variable carries the given category.
    #[must_use]
    pub fn is_in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

/// The full set of variables, in name order, with lookup by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vars {
    vars: Vec<Var>,
    by_name: HashMap<VarName, usize>,
}

impl Vars {
    /// Builds a fresh set at the defined initial values.
    #[must_use]
    pub fn from_definitions(definitions: &BTreeMap<VarName, VarDefinition>) -> Self {
        let vars: Vec<Var> = definitions
            .iter()
            .map(|(name, definition)| Var::from_definition(name.clone(), definition))
            .collect();
        let by_name = vars
            .iter()
            .enumerate()
            .map(|(index, var)| (var.name.clone(), index))
            .collect();
        Self { vars, by_name }
    }

    /// Looks a variable up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Var> {
        self.by_name.get(name).map(|&index| &self.vars[index])
    }

    /// Current value of a variable.
    #[must_use]
    pub fn value(&self, name: &VarName) -> Option<Value> {
        self.get(name.as_str()).map(Var::value)
    }

    /// Applies a batch of changes.
    ///
    /// Every name is resolved before anything is written, so a failed batch
    /// leaves the set untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownVariable` for the first name that does
    /// not exist, or `DomainError::Validation` if a value is of a different
    /// kind than the variable holds.
    pub fn update(&mut self, changes: &Changes) -> Result<(), DomainError> {
        let resolved = changes
            .iter()
            .map(|(name, value)| {
                let index = *self
                    .by_name
                    .get(name)
                    .ok_or_else(|| DomainError::UnknownVariable(name.to_string()))?;
                let current = self.vars[index].value;
                if !current.same_kind(*value) {
                    return Err(DomainError::Validation(format!(
                        "variable {name} holds a {} but was given a {}",
                        current.kind(),
                        value.kind()
                    )));
                }
                Ok((index, *value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (index, value) in resolved {
            self.vars[index].update(value);
        }
        Ok(())
    }

    /// Evaluates a condition against the current values.
    #[must_use]
    pub fn holds(&self, condition: &Condition) -> bool {
        condition.holds(&|name: &VarName| self.value(name))
    }

    /// Iterates the variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Var> {
        self.vars.iter()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the story defines no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Name-to-value snapshot, convenient for comparing states.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<VarName, Value> {
        self.vars
            .iter()
            .map(|var| (var.name.clone(), var.value))
            .collect()
    }
}
