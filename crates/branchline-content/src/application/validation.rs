//! Load-time cross-reference checks.
//!
//! Runtime lookups by variable name can still fail (a caller may build a
//! choice by hand), but authored content is rejected up front if it names a
//! variable that does not exist.

use tracing::debug;

use crate::domain::condition::Condition;
use crate::domain::story::StoryDefinition;
use crate::error::ContentError;

/// Validates every variable reference in the story.
///
/// # Errors
///
/// Returns `ContentError::Invalid` with one message per problem.
pub fn validate(story: &StoryDefinition) -> Result<(), ContentError> {
    let mut problems = Vec::new();

    let check_condition = |condition: &Condition, location: &str, problems: &mut Vec<String>| {
        for cmp in condition.comparisons() {
            match story.vars.get(&cmp.var) {
                None => problems.push(format!("{location}: unknown variable `{}`", cmp.var)),
                Some(def) if !def.value.same_kind(cmp.value) => problems.push(format!(
                    "{location}: `{}` is a {} but is compared with a {}",
                    cmp.var,
                    def.value.kind(),
                    cmp.value.kind()
                )),
                Some(_) => {}
            }
        }
    };

    for (index, step) in story.steps.iter().enumerate() {
        check_condition(&step.assert, &format!("step {index} assert"), &mut problems);

        for (option_index, option) in step.options.iter().enumerate() {
            let location = format!("step {index} option {option_index}");

            for (name, value) in &option.changes {
                match story.vars.get(name) {
                    None => problems.push(format!("{location}: unknown variable `{name}`")),
                    Some(def) if !def.value.same_kind(*value) => problems.push(format!(
                        "{location}: `{name}` is a {} but is set to a {}",
                        def.value.kind(),
                        value.kind()
                    )),
                    Some(_) => {}
                }
            }

            for risk in &option.risks {
                if !story.vars.contains_key(&risk.var) {
                    problems.push(format!("{location}: unknown risk variable `{}`", risk.var));
                }
                if !(0.0..=1.0).contains(&risk.odds) {
                    problems.push(format!(
                        "{location}: risk `{}` has odds {} outside [0, 1]",
                        risk.var, risk.odds
                    ));
                }
                check_condition(
                    &risk.when,
                    &format!("{location} risk `{}`", risk.var),
                    &mut problems,
                );
            }
        }
    }

    for (index, ending) in story.endings.iter().enumerate() {
        if let Some(trigger) = &ending.trigger
            && !story.vars.contains_key(trigger)
        {
            problems.push(format!("ending {index}: unknown trigger variable `{trigger}`"));
        }
    }

    if problems.is_empty() {
        debug!(
            steps = story.steps.len(),
            vars = story.vars.len(),
            endings = story.endings.len(),
            "story validated"
        );
        Ok(())
    } else {
        Err(ContentError::Invalid(problems))
    }
}

#[cfg(test)]
mod tests {
    use crate::application::loader::parse_story_yaml;
    use crate::error::ContentError;

    fn problems_of(yaml: &str) -> Vec<String> {
        let story = parse_story_yaml(yaml).unwrap();
        match story.validate() {
            Err(ContentError::Invalid(problems)) => problems,
            Ok(()) => Vec::new(),
            Err(other) => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_story_passes() {
        let problems = problems_of(
            r"
vars:
  exposure: { value: 0, category: risk }
steps:
  - assert: { lt: { var: exposure, value: 5 } }
    options:
      - label: Go
        changes: { exposure: 2 }
        risks:
          - var: exposure
            when: { gte: { var: exposure, value: 2 } }
            odds: 0.5
endings:
  - title: Burned
    trigger: exposure
  - title: Fine
",
        );

        assert!(problems.is_empty(), "unexpected problems: {problems:?}");
    }

    #[test]
    fn test_unknown_variables_are_all_reported() {
        let problems = problems_of(
            r"
vars:
  exposure: { value: 0 }
steps:
  - assert: { eq: { var: ghost, value: 1 } }
    options:
      - label: Go
        changes: { phantom: 2 }
        risks:
          - var: spectre
endings:
  - title: Haunted
    trigger: wraith
",
        );

        assert_eq!(problems.len(), 4);
        assert!(problems[0].contains("`ghost`"));
        assert!(problems[1].contains("`phantom`"));
        assert!(problems[2].contains("`spectre`"));
        assert!(problems[3].contains("`wraith`"));
    }

    #[test]
    fn test_kind_mismatch_is_reported() {
        let problems = problems_of(
            r"
vars:
  married: { value: false }
steps:
  - options:
      - label: Wed
        changes: { married: 1 }
",
        );

        assert_eq!(
            problems,
            vec!["step 0 option 0: `married` is a bool but is set to a number".to_owned()]
        );
    }

    #[test]
    fn test_odds_outside_unit_interval_are_reported() {
        let problems = problems_of(
            r"
vars:
  exposure: { value: 0 }
steps:
  - options:
      - label: Gamble
        risks:
          - var: exposure
            odds: 1.5
",
        );

        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("outside [0, 1]"));
    }
}
