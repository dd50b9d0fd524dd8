//! The game orchestrator.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use branchline_content::{StoryDefinition, VarDefinition, VarName};
use branchline_core::clock::Clock;
use branchline_core::error::DomainError;
use branchline_core::event::{EventMetadata, EventSubscriber};
use branchline_core::rng::DeterministicRng;
use tracing::{debug, info};
use uuid::Uuid;

use super::choice::{Changes, Choice};
use super::config::{GameConfig, GameOverPolicy};
use super::ending::Ending;
use super::events::{
    CHOICE_SELECTED_EVENT_TYPE, CHOICE_UNDONE_EVENT_TYPE, ChoiceSelected, ChoiceUndone, GameEvent,
    GameEventKind,
};
use super::step::Step;
use super::var::{RISK_CATEGORY, Var, Vars};

/// Boxed subscriber to game events.
pub type GameSubscriber = Box<dyn EventSubscriber<GameEvent>>;

/// A single play-through of a story.
///
/// The only stored state is the choice history. Variables are rebuilt by
/// replaying it, and journey, game-over and ending are derived on each read.
pub struct Game {
    id: Uuid,
    config: GameConfig,
    clock: Arc<dyn Clock>,
    var_definitions: BTreeMap<VarName, VarDefinition>,
    steps: Vec<Step>,
    endings: Vec<Ending>,
    vars: Vars,
    history: Vec<Choice>,
    version: i64,
    subscribers: Vec<GameSubscriber>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("steps", &self.steps.len())
            .field("history", &self.history)
            .field("version", &self.version)
            .field("vars", &self.vars)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Starts a new game on `story`.
    ///
    /// # Panics
    ///
    /// Never: the initial replay runs over an empty history.
    #[must_use]
    pub fn new(story: StoryDefinition, config: GameConfig, clock: Arc<dyn Clock>) -> Self {
        let StoryDefinition {
            vars: var_definitions,
            steps,
            endings,
            ..
        } = story;

        let steps: Vec<Step> = steps
            .into_iter()
            .enumerate()
            .map(|(index, definition)| Step::from_definition(index, definition))
            .collect();
        let endings = endings.into_iter().map(Ending::from_definition).collect();

        let mut game = Self {
            id: Uuid::new_v4(),
            config,
            clock,
            var_definitions,
            steps,
            endings,
            vars: Vars::default(),
            history: Vec::new(),
            version: 0,
            subscribers: Vec::new(),
        };
        // Replaying no choices cannot fail.
        game.apply().expect("empty history replays");

        info!(
            game_id = %game.id,
            policy = %game.config.game_over,
            "Starting game with {} steps",
            game.steps.len()
        );
        game
    }

    /// Registers a subscriber for selection and undo events.
    pub fn subscribe(&mut self, subscriber: GameSubscriber) {
        self.subscribers.push(subscriber);
    }

    /// Rebuilds the variables from their definitions and replays history.
    ///
    /// The new set replaces the old one only if every choice replays.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownVariable` if a recorded choice no longer
    /// applies.
    pub(crate) fn apply(&mut self) -> Result<(), DomainError> {
        let mut vars = Vars::from_definitions(&self.var_definitions);
        for choice in &self.history {
            vars.update(choice.changes())?;
        }
        debug!(game_id = %self.id, replayed = self.history.len(), "variables rebuilt");
        self.vars = vars;
        Ok(())
    }

    /// Applies a batch of changes to the current variables, all or nothing.
    fn update(&mut self, changes: &Changes) -> Result<(), DomainError> {
        self.vars.update(changes)
    }

    /// Resolves option `option_index` on the current step into a choice.
    ///
    /// Risks are rolled here; the returned choice carries the outcome.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameOver` when the game has ended,
    /// `DomainError::StepNotCurrent` if `step_index` is not the presented
    /// step, `DomainError::StepAlreadyAnswered` if the presented step is the
    /// one last played (a played-out story under `ConsequencesOnly`), or
    /// `DomainError::UnknownOption` if the option does not exist.
    pub fn choose(
        &self,
        step_index: usize,
        option_index: usize,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Choice, DomainError> {
        let current = self.step().ok_or(DomainError::GameOver)?;
        if current.index() != step_index {
            return Err(DomainError::StepNotCurrent {
                requested: step_index,
                current: current.index(),
            });
        }
        if self
            .history
            .last()
            .is_some_and(|choice| choice.step() == current.index())
        {
            return Err(DomainError::StepAlreadyAnswered(current.index()));
        }
        Choice::resolve(current, option_index, &self.vars, rng)
    }

    /// Applies `choice` and appends it to the history.
    ///
    /// A choice whose risks fired is a loss, which is logged and reflected
    /// in the derived state; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStep` if the choice names a step outside
    /// the story, `DomainError::UnknownVariable` if it changes a variable
    /// that does not exist, or `DomainError::Validation` if it assigns a
    /// value of the wrong kind. Nothing is changed in any of these cases.
    pub fn select(&mut self, choice: Choice, correlation_id: Uuid) -> Result<(), DomainError> {
        if choice.step() >= self.steps.len() {
            return Err(DomainError::UnknownStep(choice.step()));
        }
        self.update(choice.changes())?;
        self.history.push(choice.clone());

        debug!(
            game_id = %self.id,
            step = choice.step(),
            option = ?choice.option(),
            history = self.history.len(),
            "choice selected"
        );
        if choice.take_risks() {
            let causes: Vec<&str> = choice.consequences().iter().map(VarName::as_str).collect();
            info!(game_id = %self.id, "Losing causes: {}", causes.join(", "));
        }

        self.publish(
            correlation_id,
            GameEventKind::ChoiceSelected(ChoiceSelected {
                game_id: self.id,
                history_len: self.history.len(),
                choice,
            }),
        );
        Ok(())
    }

    /// Removes the last choice and rebuilds the variables by full replay.
    ///
    /// Undoing with an empty history is a no-op and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the replay error if the remaining history no longer applies;
    /// the removed choice is put back in that case.
    pub fn undo(&mut self, correlation_id: Uuid) -> Result<Option<Choice>, DomainError> {
        let Some(choice) = self.history.pop() else {
            debug!(game_id = %self.id, "nothing to undo");
            return Ok(None);
        };

        if let Err(err) = self.apply() {
            self.history.push(choice);
            return Err(err);
        }

        debug!(
            game_id = %self.id,
            step = choice.step(),
            history = self.history.len(),
            "choice undone"
        );
        self.publish(
            correlation_id,
            GameEventKind::ChoiceUndone(ChoiceUndone {
                game_id: self.id,
                history_len: self.history.len(),
                choice: choice.clone(),
            }),
        );
        Ok(Some(choice))
    }

    /// Returns the next sequence number for a new event.
    fn next_sequence_number(&self) -> i64 {
        self.version + 1
    }

    fn publish(&mut self, correlation_id: Uuid, kind: GameEventKind) {
        let event_type = match &kind {
            GameEventKind::ChoiceSelected(_) => CHOICE_SELECTED_EVENT_TYPE,
            GameEventKind::ChoiceUndone(_) => CHOICE_UNDONE_EVENT_TYPE,
        };
        let event = GameEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: event_type.to_owned(),
                game_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: self.clock.now(),
            },
            kind,
        };
        self.version = event.metadata.sequence_number;
        for subscriber in &self.subscribers {
            subscriber.notify(&event);
        }
    }

    /// Whether the game has ended, according to the configured policy.
    #[must_use]
    pub fn is_over(&self) -> bool {
        let lost = self.history.iter().any(Choice::has_consequences);
        match self.config.game_over {
            GameOverPolicy::ConsequencesOnly => lost,
            GameOverPolicy::ConsequencesOrExhausted => lost || !self.has_steps_ahead(),
        }
    }

    /// Every consequence recorded so far, deduplicated, in first-seen order.
    #[must_use]
    pub fn consequences(&self) -> Vec<&VarName> {
        let mut seen: Vec<&VarName> = Vec::new();
        for consequence in self.history.iter().flat_map(Choice::consequences) {
            if !seen.contains(&consequence) {
                seen.push(consequence);
            }
        }
        seen
    }

    /// The step of every choice made, in play order.
    #[must_use]
    pub fn steps_behind(&self) -> Vec<&Step> {
        self.history
            .iter()
            .filter_map(|choice| self.steps.get(choice.step()))
            .collect()
    }

    /// Steps after the last one played whose assert holds right now.
    #[must_use]
    pub fn steps_ahead(&self) -> Vec<&Step> {
        self.reachable_ahead().collect()
    }

    /// Whether any valid step remains ahead.
    #[must_use]
    pub fn has_steps_ahead(&self) -> bool {
        self.reachable_ahead().next().is_some()
    }

    fn reachable_ahead(&self) -> impl Iterator<Item = &Step> {
        let from = self
            .history
            .last()
            .map_or(0, |choice| choice.step() + 1);
        self.steps
            .iter()
            .skip(from)
            .filter(|step| step.assert(&self.vars))
    }

    /// Whether any choice has been made.
    #[must_use]
    pub fn has_steps_behind(&self) -> bool {
        !self.history.is_empty()
    }

    /// Steps seen so far plus, while the game is running, the next one.
    #[must_use]
    pub fn journey(&self) -> Vec<&Step> {
        let mut journey = self.steps_behind();
        if !self.is_over() {
            journey.extend(self.steps_ahead().into_iter().take(1));
        }
        journey
    }

    /// The step being presented, or `None` once the game is over.
    #[must_use]
    pub fn step(&self) -> Option<&Step> {
        if self.is_over() {
            return None;
        }
        self.journey().last().copied()
    }

    /// Index of the step being presented.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoCurrentStep` if there is none.
    pub fn step_index(&self) -> Result<usize, DomainError> {
        self.step()
            .map(Step::index)
            .ok_or(DomainError::NoCurrentStep)
    }

    /// Whether `step` is the one being presented.
    #[must_use]
    pub fn is_current(&self, step: &Step) -> bool {
        self.step().is_some_and(|current| current.index() == step.index())
    }

    /// The ending that applies to the current history.
    ///
    /// With consequences, the last ending keyed on the last consequence;
    /// otherwise the last ending without a condition.
    #[must_use]
    pub fn end(&self) -> Option<&Ending> {
        match self.consequences().last() {
            Some(last) => self.endings_for(last.as_str()).last().copied(),
            None => self.endings.iter().rev().find(|ending| !ending.has_condition()),
        }
    }

    /// Endings keyed on `name`, in authoring order.
    #[must_use]
    pub fn endings_for(&self, name: &str) -> Vec<&Ending> {
        self.endings
            .iter()
            .filter(|ending| ending.trigger().is_some_and(|trigger| trigger.as_str() == name))
            .collect()
    }

    /// Endings keyed on some variable, in authoring order.
    #[must_use]
    pub fn endings_with_var(&self) -> Vec<&Ending> {
        self.endings
            .iter()
            .filter(|ending| ending.has_condition())
            .collect()
    }

    /// Feedback attached to the most recent choice.
    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.history.last().and_then(Choice::feedback)
    }

    /// Whether the most recent choice carries feedback.
    #[must_use]
    pub fn has_feedback(&self) -> bool {
        self.feedback().is_some()
    }

    /// Distinct step years across the whole story, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.steps.iter().filter_map(Step::year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Looks a variable up by name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownVariable` if no variable has that name.
    pub fn var(&self, name: &str) -> Result<&Var, DomainError> {
        self.vars
            .get(name)
            .ok_or_else(|| DomainError::UnknownVariable(name.to_owned()))
    }

    /// Variables in the given category.
    #[must_use]
    pub fn vars_in_category(&self, category: &str) -> Vec<&Var> {
        self.vars
            .iter()
            .filter(|var| var.is_in_category(category))
            .collect()
    }

    /// Variables in the `risk` category.
    #[must_use]
    pub fn risks(&self) -> Vec<&Var> {
        self.vars_in_category(RISK_CATEGORY)
    }

    /// Public variables in the `risk` category.
    #[must_use]
    pub fn public_risks(&self) -> Vec<&Var> {
        self.vars
            .iter()
            .filter(|var| var.is_in_category(RISK_CATEGORY) && var.is_public())
            .collect()
    }

    /// Variables shown to the player.
    #[must_use]
    pub fn public_vars(&self) -> Vec<&Var> {
        self.vars.iter().filter(|var| var.is_public()).collect()
    }

    /// Game identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Number of events published so far.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Current variables.
    #[must_use]
    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Choices made so far, in play order.
    #[must_use]
    pub fn history(&self) -> &[Choice] {
        &self.history
    }

    /// All steps, in story order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// All endings, in authoring order.
    #[must_use]
    pub fn endings(&self) -> &[Ending] {
        &self.endings
    }
}

#[cfg(test)]
mod tests {
    use branchline_content::Value;
    use branchline_core::event::DomainEvent;
    use branchline_test_support::{
        FixedClock, MockRng, RecordingSubscriber, SequenceRng, fixed_now, sample_story,
    };

    use super::*;

    fn new_game() -> Game {
        Game::new(sample_story(), GameConfig::default(), Arc::new(FixedClock::default()))
    }

    fn play(game: &mut Game, option: usize, rng: &mut dyn DeterministicRng) -> Choice {
        let step = game.step_index().unwrap();
        let choice = game.choose(step, option, rng).unwrap();
        game.select(choice.clone(), Uuid::new_v4()).unwrap();
        choice
    }

    fn indices(steps: &[&Step]) -> Vec<usize> {
        steps.iter().map(|step| step.index()).collect()
    }

    fn number(game: &Game, name: &str) -> f64 {
        game.var(name).unwrap().value().as_number().unwrap()
    }

    // --- construction ---

    #[test]
    fn test_new_game_starts_at_first_step() {
        let game = new_game();

        assert!(!game.is_over());
        assert!(game.history().is_empty());
        assert_eq!(indices(&game.steps_ahead())[0], 0);
        assert_eq!(game.step_index(), Ok(0));
        assert_eq!(indices(&game.journey()), vec![0]);
        assert!(game.steps_behind().is_empty());
        assert!(!game.has_steps_behind());
        assert!(game.consequences().is_empty());
        assert_eq!(game.feedback(), None);
    }

    #[test]
    fn test_new_game_vars_match_definitions() {
        let game = new_game();

        assert_eq!(
            game.vars(),
            &Vars::from_definitions(&sample_story().vars)
        );
        assert_eq!(game.version(), 0);

        assert_eq!(game.vars().len(), 4);
        assert_eq!(number(&game, "savings"), 100.0);
        assert_eq!(game.var("married").unwrap().value(), Value::Bool(false));
    }

    #[test]
    fn test_years_are_distinct_and_sorted() {
        let game = new_game();

        assert_eq!(game.years(), vec![2008, 2010, 2012]);
    }

    #[test]
    fn test_var_filters() {
        let game = new_game();

        let names = |vars: Vec<&Var>| -> Vec<String> {
            vars.iter().map(|var| var.name().to_string()).collect()
        };
        assert_eq!(names(game.risks()), vec!["debt", "exposure"]);
        assert_eq!(names(game.public_risks()), vec!["exposure"]);
        assert_eq!(names(game.public_vars()), vec!["exposure", "savings"]);
        assert_eq!(names(game.vars_in_category("money")), vec!["savings"]);
    }

    #[test]
    fn test_var_lookup_of_unknown_name_fails() {
        let game = new_game();

        assert_eq!(
            game.var("luck").unwrap_err(),
            DomainError::UnknownVariable("luck".to_owned())
        );
    }

    // --- select ---

    #[test]
    fn test_select_advances_vars_and_journey() {
        let mut game = new_game();

        play(&mut game, 1, &mut MockRng);

        assert_eq!(number(&game, "savings"), 150.0);
        assert_eq!(game.step_index(), Ok(1));
        assert_eq!(indices(&game.journey()), vec![0, 1]);
        assert_eq!(indices(&game.steps_behind()), vec![0]);
        assert_eq!(game.feedback(), Some("Slow and steady."));
        assert!(game.has_feedback());
    }

    #[test]
    fn test_gated_step_is_skipped_when_assert_fails() {
        let mut game = new_game();
        play(&mut game, 1, &mut MockRng);

        play(&mut game, 1, &mut MockRng);

        assert_eq!(indices(&game.steps_ahead()), vec![3]);
        assert_eq!(game.step_index(), Ok(3));
    }

    #[test]
    fn test_gated_step_is_reached_when_assert_holds() {
        let mut game = new_game();
        play(&mut game, 1, &mut MockRng);

        play(&mut game, 0, &mut MockRng);

        assert_eq!(indices(&game.steps_ahead()), vec![2, 3]);
        assert_eq!(game.step_index(), Ok(2));
    }

    #[test]
    fn test_steps_ahead_never_contains_a_failing_step() {
        let paths: [&[usize]; 3] = [&[1, 1, 0], &[1, 0, 1, 0], &[0]];

        for path in paths {
            let mut game = new_game();
            for &option in path {
                if game.is_over() {
                    break;
                }
                play(&mut game, option, &mut SequenceRng::new(vec![0.9]));
                for step in game.steps_ahead() {
                    assert!(step.assert(game.vars()));
                }
                assert!(game.journey().len() <= game.steps_behind().len() + 1);
            }
            assert!(game.has_steps_behind());
        }
    }

    #[test]
    fn test_losing_choice_ends_the_game_with_matching_ending() {
        let mut game = new_game();

        let choice = play(&mut game, 0, &mut SequenceRng::new(vec![0.1]));

        assert!(choice.take_risks());
        assert!(game.is_over());
        assert_eq!(game.step(), None);
        assert_eq!(game.step_index(), Err(DomainError::NoCurrentStep));
        assert_eq!(indices(&game.journey()), vec![0]);
        assert_eq!(game.consequences(), vec![&VarName::new("exposure")]);
        assert_eq!(game.end().unwrap().title(), "Ruined by speculation");
    }

    #[test]
    fn test_surviving_a_risk_keeps_playing() {
        let mut game = new_game();

        let choice = play(&mut game, 0, &mut SequenceRng::new(vec![0.9]));

        assert!(!choice.take_risks());
        assert!(!game.is_over());
        assert_eq!(number(&game, "exposure"), 3.0);
        assert_eq!(game.step_index(), Ok(1));
    }

    #[test]
    fn test_end_picks_last_ending_for_last_consequence() {
        let mut game = new_game();
        play(&mut game, 1, &mut MockRng);
        play(&mut game, 0, &mut MockRng);

        play(&mut game, 0, &mut MockRng);

        assert!(game.is_over());
        assert_eq!(game.endings_for("debt").len(), 2);
        assert_eq!(game.end().unwrap().title(), "Debt, revisited");
    }

    #[test]
    fn test_end_without_consequences_is_last_fallback() {
        let game = new_game();

        assert_eq!(game.end().unwrap().title(), "A quiet life");
        assert_eq!(game.endings_with_var().len(), 3);
        assert_eq!(game.endings().len(), 5);
    }

    #[test]
    fn test_consequences_are_deduplicated_in_first_seen_order() {
        let mut game = new_game();
        let tagged = |tags: &[&str]| {
            Choice::new(0, Changes::new()).with_consequences(tags.iter().map(|t| VarName::new(*t)))
        };

        game.select(tagged(&["debt", "exposure"]), Uuid::new_v4()).unwrap();
        game.select(tagged(&["exposure"]), Uuid::new_v4()).unwrap();
        game.select(tagged(&["debt"]), Uuid::new_v4()).unwrap();

        assert_eq!(
            game.consequences(),
            vec![&VarName::new("debt"), &VarName::new("exposure")]
        );
        assert_eq!(game.end().unwrap().title(), "Ruined by speculation");
    }

    #[test]
    fn test_exhausting_steps_ends_game_under_default_policy() {
        let mut game = new_game();
        for option in [1, 1, 0] {
            play(&mut game, option, &mut MockRng);
        }

        assert!(game.is_over());
        assert!(!game.has_steps_ahead());
        assert_eq!(game.step(), None);
        assert_eq!(indices(&game.journey()), vec![0, 1, 3]);
        assert_eq!(game.end().unwrap().title(), "A quiet life");
    }

    #[test]
    fn test_exhausting_steps_keeps_game_open_under_consequences_only() {
        let config = GameConfig {
            game_over: GameOverPolicy::ConsequencesOnly,
        };
        let mut game = Game::new(sample_story(), config, Arc::new(FixedClock::default()));
        for option in [1, 1, 0] {
            play(&mut game, option, &mut MockRng);
        }

        assert!(!game.is_over());
        assert!(game.steps_ahead().is_empty());
        assert_eq!(indices(&game.journey()), vec![0, 1, 3]);
        assert_eq!(game.step_index(), Ok(3));
    }

    #[test]
    fn test_played_out_step_cannot_be_answered_again() {
        let config = GameConfig {
            game_over: GameOverPolicy::ConsequencesOnly,
        };
        let mut game = Game::new(sample_story(), config, Arc::new(FixedClock::default()));
        for option in [1, 1, 0] {
            play(&mut game, option, &mut MockRng);
        }

        let result = game.choose(3, 0, &mut MockRng);

        assert_eq!(result, Err(DomainError::StepAlreadyAnswered(3)));
        assert_eq!(game.history().len(), 3);
        assert_eq!(indices(&game.steps_behind()), vec![0, 1, 3]);
    }

    #[test]
    fn test_is_current_tracks_presented_step() {
        let mut game = new_game();
        play(&mut game, 1, &mut MockRng);

        assert!(game.is_current(&game.steps()[1]));
        assert!(!game.is_current(&game.steps()[0]));
    }

    // --- select failures ---

    #[test]
    fn test_select_with_unknown_variable_changes_nothing() {
        let mut game = new_game();
        let before = game.vars().snapshot();
        let choice = Choice::new(
            0,
            Changes::from([
                (VarName::new("savings"), Value::Number(1.0)),
                (VarName::new("luck"), Value::Number(7.0)),
            ]),
        );

        let result = game.select(choice, Uuid::new_v4());

        assert_eq!(result, Err(DomainError::UnknownVariable("luck".to_owned())));
        assert_eq!(game.vars().snapshot(), before);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_select_with_wrong_value_kind_is_rejected() {
        let mut game = new_game();
        let choice = Choice::new(
            1,
            Changes::from([(VarName::new("married"), Value::Number(1.0))]),
        );

        let result = game.select(choice, Uuid::new_v4());

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(game.var("married").unwrap().value(), Value::Bool(false));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_select_with_unknown_step_is_rejected() {
        let mut game = new_game();

        let result = game.select(Choice::new(42, Changes::new()), Uuid::new_v4());

        assert_eq!(result, Err(DomainError::UnknownStep(42)));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut game = new_game();
        let before = game.vars().snapshot();

        let result = game.update(&Changes::from([
            (VarName::new("debt"), Value::Number(9.0)),
            (VarName::new("nope"), Value::Number(1.0)),
        ]));

        assert!(matches!(result, Err(DomainError::UnknownVariable(_))));
        assert_eq!(game.vars().snapshot(), before);
    }

    #[test]
    fn test_choose_rejects_step_that_is_not_current() {
        let game = new_game();

        let result = game.choose(2, 0, &mut MockRng);

        assert_eq!(
            result,
            Err(DomainError::StepNotCurrent {
                requested: 2,
                current: 0
            })
        );
    }

    #[test]
    fn test_choose_after_game_over_fails() {
        let mut game = new_game();
        play(&mut game, 0, &mut MockRng);

        let result = game.choose(1, 0, &mut MockRng);

        assert_eq!(result, Err(DomainError::GameOver));
    }

    // --- undo and replay ---

    #[test]
    fn test_undo_on_empty_history_is_a_no_op() {
        let mut game = new_game();
        let recorder = RecordingSubscriber::<GameEvent>::new();
        game.subscribe(Box::new(recorder.clone()));

        let result = game.undo(Uuid::new_v4());

        assert_eq!(result, Ok(None));
        assert!(recorder.recorded_events().is_empty());
        assert_eq!(game.step_index(), Ok(0));
    }

    #[test]
    fn test_select_then_undo_restores_previous_state() {
        let mut game = new_game();
        play(&mut game, 1, &mut MockRng);
        let vars_before = game.vars().snapshot();
        let step_before = game.step_index();

        let choice = play(&mut game, 0, &mut MockRng);
        let undone = game.undo(Uuid::new_v4()).unwrap();

        assert_eq!(undone, Some(choice));
        assert_eq!(game.vars().snapshot(), vars_before);
        assert_eq!(game.step_index(), step_before);
    }

    #[test]
    fn test_undo_after_loss_reopens_the_game() {
        let mut game = new_game();
        play(&mut game, 0, &mut MockRng);
        assert!(game.is_over());

        game.undo(Uuid::new_v4()).unwrap();

        assert!(!game.is_over());
        assert_eq!(game.step_index(), Ok(0));
        assert!(game.consequences().is_empty());
        assert_eq!(number(&game, "exposure"), 0.0);
    }

    #[test]
    fn test_three_selects_two_undos_equals_first_choice_only() {
        let mut reference = new_game();
        play(&mut reference, 1, &mut MockRng);

        let mut game = new_game();
        play(&mut game, 1, &mut MockRng);
        play(&mut game, 0, &mut MockRng);
        play(&mut game, 1, &mut MockRng);
        game.undo(Uuid::new_v4()).unwrap();
        game.undo(Uuid::new_v4()).unwrap();

        assert_eq!(game.history().len(), 1);
        assert_eq!(game.vars().snapshot(), reference.vars().snapshot());
        assert_eq!(game.step_index(), reference.step_index());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut game = new_game();
        play(&mut game, 1, &mut MockRng);
        play(&mut game, 0, &mut MockRng);
        let incremental = game.vars().snapshot();

        game.apply().unwrap();
        let first = game.vars().snapshot();
        game.apply().unwrap();

        assert_eq!(first, incremental);
        assert_eq!(game.vars().snapshot(), first);
    }

    // --- events ---

    #[test]
    fn test_select_and_undo_publish_events() {
        let mut game = new_game();
        let recorder = RecordingSubscriber::<GameEvent>::new();
        game.subscribe(Box::new(recorder.clone()));
        let select_correlation = Uuid::new_v4();
        let undo_correlation = Uuid::new_v4();

        let choice = game.choose(0, 1, &mut MockRng).unwrap();
        game.select(choice.clone(), select_correlation).unwrap();
        game.undo(undo_correlation).unwrap();

        let events: Vec<GameEvent> = recorder.recorded_events();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].event_type(), CHOICE_SELECTED_EVENT_TYPE);
        let meta = events[0].metadata();
        assert_eq!(meta.game_id, game.id());
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, select_correlation);
        assert_eq!(meta.causation_id, select_correlation);
        assert_eq!(meta.occurred_at, fixed_now());
        assert_eq!(events[0].choice(), &choice);

        assert_eq!(events[1].event_type(), CHOICE_UNDONE_EVENT_TYPE);
        assert_eq!(events[1].metadata().sequence_number, 2);
        assert_eq!(events[1].metadata().correlation_id, undo_correlation);
        match &events[1].kind {
            GameEventKind::ChoiceUndone(payload) => {
                assert_eq!(payload.choice, choice);
                assert_eq!(payload.history_len, 0);
            }
            other => panic!("expected ChoiceUndone, got {other:?}"),
        }
        assert_eq!(game.version(), 2);
    }

    #[test]
    fn test_sequence_numbers_never_repeat_across_undo() {
        let mut game = new_game();
        let recorder = RecordingSubscriber::<GameEvent>::new();
        game.subscribe(Box::new(recorder.clone()));

        play(&mut game, 1, &mut MockRng);
        play(&mut game, 1, &mut MockRng);
        game.undo(Uuid::new_v4()).unwrap();
        play(&mut game, 0, &mut MockRng);

        let events = recorder.recorded_events();
        let sequence: Vec<i64> = events
            .iter()
            .map(|event| event.metadata().sequence_number)
            .collect();
        let lengths: Vec<usize> = events
            .iter()
            .map(|event| match &event.kind {
                GameEventKind::ChoiceSelected(payload) => payload.history_len,
                GameEventKind::ChoiceUndone(payload) => payload.history_len,
            })
            .collect();
        assert_eq!(sequence, vec![1, 2, 3, 4]);
        assert_eq!(lengths, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_failed_select_publishes_nothing() {
        let mut game = new_game();
        let recorder = RecordingSubscriber::<GameEvent>::new();
        game.subscribe(Box::new(recorder.clone()));

        let _ = game.select(Choice::new(99, Changes::new()), Uuid::new_v4());

        assert!(recorder.recorded_events().is_empty());
    }

    #[test]
    fn test_channel_sender_receives_events() {
        let mut game = new_game();
        let (sender, receiver) = std::sync::mpsc::channel::<GameEvent>();
        game.subscribe(Box::new(sender));

        play(&mut game, 1, &mut MockRng);

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.event_type(), CHOICE_SELECTED_EVENT_TYPE);
        assert_eq!(event.choice().step(), 0);
    }
}
