//! Predicates over story variables.
//!
//! Conditions gate steps (`assert`) and risks (`when`). They are written as
//! single-key maps, or a bare word for the constant forms:
//!
//! ```yaml
//! assert: always
//! assert: { gte: { var: exposure, value: 3 } }
//! assert: { all: [ { eq: { var: married, value: true } }, { not: never } ] }
//! ```

use serde::{Deserialize, Serialize};

use super::value::{Value, VarName};

/// A comparison between one variable and a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The variable being inspected.
    pub var: VarName,
    /// The literal it is compared against.
    pub value: Value,
}

/// A boolean predicate over the current variable state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Always holds.
    #[default]
    Always,
    /// Never holds.
    Never,
    /// Variable equals the literal.
    Eq(Comparison),
    /// Variable differs from the literal.
    Ne(Comparison),
    /// Variable is strictly below the literal.
    Lt(Comparison),
    /// Variable is at most the literal.
    Lte(Comparison),
    /// Variable is strictly above the literal.
    Gt(Comparison),
    /// Variable is at least the literal.
    Gte(Comparison),
    /// Every nested condition holds.
    All(Vec<Condition>),
    /// At least one nested condition holds.
    Any(Vec<Condition>),
    /// The nested condition does not hold.
    Not(Box<Condition>),
}

impl Condition {
    /// Evaluates the condition.
    ///
    /// `lookup` resolves a variable to its current value. An ordering or
    /// `eq` comparison on a variable that `lookup` cannot resolve, or between
    /// values of different kinds, is false. `ne` is the exact negation of
    /// `eq`.
    pub fn holds<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&VarName) -> Option<Value>,
    {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Eq(cmp) => lookup(&cmp.var).is_some_and(|v| v == cmp.value),
            Self::Ne(cmp) => !lookup(&cmp.var).is_some_and(|v| v == cmp.value),
            Self::Lt(cmp) => lookup(&cmp.var).is_some_and(|v| v < cmp.value),
            Self::Lte(cmp) => lookup(&cmp.var).is_some_and(|v| v <= cmp.value),
            Self::Gt(cmp) => lookup(&cmp.var).is_some_and(|v| v > cmp.value),
            Self::Gte(cmp) => lookup(&cmp.var).is_some_and(|v| v >= cmp.value),
            Self::All(conditions) => conditions.iter().all(|c| c.holds(lookup)),
            Self::Any(conditions) => conditions.iter().any(|c| c.holds(lookup)),
            Self::Not(inner) => !inner.holds(lookup),
        }
    }

    /// Collects every comparison in this condition, depth first.
    #[must_use]
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut out = Vec::new();
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a Comparison>) {
        match self {
            Self::Always | Self::Never => {}
            Self::Eq(cmp)
            | Self::Ne(cmp)
            | Self::Lt(cmp)
            | Self::Lte(cmp)
            | Self::Gt(cmp)
            | Self::Gte(cmp) => out.push(cmp),
            Self::All(conditions) | Self::Any(conditions) => {
                for condition in conditions {
                    condition.collect_comparisons(out);
                }
            }
            Self::Not(inner) => inner.collect_comparisons(out),
        }
    }
}
