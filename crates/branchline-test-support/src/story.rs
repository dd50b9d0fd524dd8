//! Story fixture shared by game tests.

use branchline_content::{StoryDefinition, parse_story_yaml};

/// A five-step story exercising gated steps, certain and probabilistic
/// risks, and several endings per consequence.
///
/// | step | year | gate           | options                                  |
/// |------|------|----------------|------------------------------------------|
/// | 0    | 2008 | always         | invest (50% exposure risk), save         |
/// | 1    | 2010 | always         | marry, stay single                       |
/// | 2    | 2012 | married        | borrow (certain debt risk), elope        |
/// | 3    | 2012 | always         | carry on                                 |
/// | 4    |      | never          | none                                     |
pub const SAMPLE_STORY_YAML: &str = r"
title: The Long Decade
vars:
  exposure: { value: 0, category: risk, public: true }
  debt: { value: 0, category: risk }
  savings: { value: 100, category: money, public: true }
  married: { value: false }
steps:
  - year: 2008
    title: A tempting offer
    options:
      - label: Invest everything
        changes: { savings: 0, exposure: 3 }
        risks:
          - var: exposure
            when: { gte: { var: exposure, value: 3 } }
            odds: 0.5
        feedback: You went all in.
      - label: Keep saving
        changes: { savings: 150 }
        feedback: Slow and steady.
  - year: 2010
    title: A proposal
    options:
      - label: Say yes
        changes: { married: true }
      - label: Say no
  - year: 2012
    title: The wedding bill
    assert: { eq: { var: married, value: true } }
    options:
      - label: Borrow
        changes: { debt: 2 }
        risks:
          - var: debt
            when: { gte: { var: debt, value: 2 } }
      - label: Elope
        changes: { savings: 50 }
  - year: 2012
    title: Quiet years
    options:
      - label: Carry on
  - title: Unreachable epilogue
    assert: never
endings:
  - title: Ruined by speculation
    trigger: exposure
  - title: Drowned in debt
    trigger: debt
  - title: Debt, revisited
    trigger: debt
  - title: A fallback
  - title: A quiet life
";

/// Parses [`SAMPLE_STORY_YAML`].
///
/// # Panics
///
/// Panics if the fixture no longer parses or validates.
#[must_use]
pub fn sample_story() -> StoryDefinition {
    let story = parse_story_yaml(SAMPLE_STORY_YAML).expect("sample story parses");
    story.validate().expect("sample story validates");
    story
}
