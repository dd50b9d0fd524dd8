//! Query handlers for the game orchestration context.
//!
//! This module turns the derived state of a game into read-only view DTOs
//! suitable for rendering or serializing.

use branchline_content::Value;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ending::Ending;
use crate::domain::game::Game;
use crate::domain::step::Step;
use crate::domain::var::Var;

/// Read-only view of a step on the journey.
#[derive(Debug, Serialize)]
pub struct StepView {
    /// Position in the story.
    pub index: usize,
    /// Display year.
    pub year: Option<i32>,
    /// Heading.
    pub title: Option<String>,
    /// Narrative body.
    pub text: Option<String>,
    /// Option labels, in order.
    pub options: Vec<String>,
    /// Whether this is the step being presented.
    pub current: bool,
}

/// Read-only view of a variable.
#[derive(Debug, Serialize)]
pub struct VarView {
    /// Variable name.
    pub name: String,
    /// Current value.
    pub value: Value,
    /// Category, if any.
    pub category: Option<String>,
}

/// Read-only view of an ending.
#[derive(Debug, Serialize)]
pub struct EndingView {
    /// Heading.
    pub title: String,
    /// Narrative body.
    pub text: Option<String>,
    /// Consequence variable the ending is keyed on.
    pub trigger: Option<String>,
}

/// Read-only view of a whole game.
#[derive(Debug, Serialize)]
pub struct GameView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Whether the game has ended.
    pub over: bool,
    /// Index of the presented step, if any.
    pub step_index: Option<usize>,
    /// Steps seen plus the presented one.
    pub journey: Vec<StepView>,
    /// Consequence tags, first-seen order.
    pub consequences: Vec<String>,
    /// Variables shown to the player.
    pub public_vars: Vec<VarView>,
    /// Public variables in the risk category.
    pub public_risks: Vec<VarView>,
    /// Distinct story years.
    pub years: Vec<i32>,
    /// Feedback from the most recent choice.
    pub feedback: Option<String>,
    /// The ending that currently applies.
    pub ending: Option<EndingView>,
    /// Number of choices made.
    pub history_len: usize,
}

fn step_view(game: &Game, step: &Step) -> StepView {
    StepView {
        index: step.index(),
        year: step.year(),
        title: step.title().map(str::to_owned),
        text: step.text().map(str::to_owned),
        options: step
            .options()
            .iter()
            .map(|option| option.label.clone())
            .collect(),
        current: game.is_current(step),
    }
}

fn var_view(var: &Var) -> VarView {
    VarView {
        name: var.name().to_string(),
        value: var.value(),
        category: var.category().map(str::to_owned),
    }
}

fn ending_view(ending: &Ending) -> EndingView {
    EndingView {
        title: ending.title().to_owned(),
        text: ending.text().map(str::to_owned),
        trigger: ending.trigger().map(ToString::to_string),
    }
}

/// Builds the read-only view of `game`.
#[must_use]
pub fn get_game_view(game: &Game) -> GameView {
    GameView {
        game_id: game.id(),
        over: game.is_over(),
        step_index: game.step_index().ok(),
        journey: game
            .journey()
            .into_iter()
            .map(|step| step_view(game, step))
            .collect(),
        consequences: game
            .consequences()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
        public_vars: game.public_vars().into_iter().map(var_view).collect(),
        public_risks: game.public_risks().into_iter().map(var_view).collect(),
        years: game.years(),
        feedback: game.feedback().map(str::to_owned),
        ending: if game.is_over() {
            game.end().map(ending_view)
        } else {
            None
        },
        history_len: game.history().len(),
    }
}
