//! Integration tests for replaying story files.

mod common;

use branchline_cli::error::AppError;
use branchline_cli::replay::{ReplayPlan, replay};
use branchline_content::{ContentError, load_story, version_hash};
use branchline_core::rng::SeededRng;
use branchline_game::{GameConfig, GameOverPolicy};
use branchline_test_support::{MockRng, SAMPLE_STORY_YAML, SequenceRng};

use common::StoryFile;

const JSON_STORY: &str = r#"{
    "title": "Coin flip",
    "vars": {
        "luck": { "value": 0, "category": "risk", "public": true }
    },
    "steps": [
        { "year": 1999, "options": [
            { "label": "Flip", "changes": { "luck": 1 },
              "risks": [ { "var": "luck", "odds": 0.5 } ] },
            { "label": "Walk away" }
        ] }
    ],
    "endings": [
        { "title": "Unlucky", "trigger": "luck" },
        { "title": "Walked away" }
    ]
}"#;

fn plan(path: &[usize]) -> ReplayPlan {
    ReplayPlan {
        path: path.to_vec(),
        undo: 0,
        config: GameConfig::default(),
    }
}

#[test]
fn test_yaml_story_replays_to_quiet_ending() {
    // Arrange
    let file = StoryFile::write(SAMPLE_STORY_YAML, "yaml");

    // Act
    let json = common::run_plan(&file, &plan(&[1, 1, 0]), &mut MockRng);

    // Assert
    assert_eq!(json["view"]["over"], true);
    assert_eq!(json["view"]["ending"]["title"], "A quiet life");
    assert_eq!(json["view"]["history_len"], 3);
    assert_eq!(json["version_hash"], version_hash(SAMPLE_STORY_YAML));
    assert_eq!(json["events"].as_array().unwrap().len(), 3);
    assert_eq!(json["events"][0]["event_type"], "game.choice_selected");
}

#[test]
fn test_yaml_story_loss_reports_consequence_ending() {
    // Arrange
    let file = StoryFile::write(SAMPLE_STORY_YAML, "yml");

    // Act
    let json = common::run_plan(&file, &plan(&[0]), &mut SequenceRng::new(vec![0.25]));

    // Assert
    assert_eq!(json["view"]["over"], true);
    assert_eq!(json["view"]["consequences"][0], "exposure");
    assert_eq!(json["view"]["ending"]["title"], "Ruined by speculation");
    assert_eq!(json["view"]["feedback"], "You went all in.");
}

#[test]
fn test_json_story_replays_with_same_model() {
    // Arrange
    let file = StoryFile::write(JSON_STORY, "json");

    // Act
    let json = common::run_plan(&file, &plan(&[1]), &mut MockRng);

    // Assert
    assert_eq!(json["view"]["over"], true);
    assert_eq!(json["view"]["ending"]["title"], "Walked away");
    assert_eq!(json["view"]["years"][0], 1999);
}

#[test]
fn test_consequences_only_policy_keeps_exhausted_story_open() {
    // Arrange
    let file = StoryFile::write(JSON_STORY, "json");
    let plan = ReplayPlan {
        path: vec![1],
        undo: 0,
        config: GameConfig {
            game_over: GameOverPolicy::ConsequencesOnly,
        },
    };

    // Act
    let json = common::run_plan(&file, &plan, &mut MockRng);

    // Assert
    assert_eq!(json["view"]["over"], false);
    assert!(json["view"]["ending"].is_null());
    assert_eq!(json["view"]["step_index"], 0);
}

#[test]
fn test_same_seed_gives_same_outcome() {
    // Arrange
    let file = StoryFile::write(JSON_STORY, "json");

    // Act
    let first = common::run_plan(&file, &plan(&[0]), &mut SeededRng::from_seed(11));
    let second = common::run_plan(&file, &plan(&[0]), &mut SeededRng::from_seed(11));

    // Assert
    assert_eq!(first["view"]["consequences"], second["view"]["consequences"]);
    assert_eq!(first["view"]["ending"], second["view"]["ending"]);
}

#[test]
fn test_undo_in_plan_reopens_lost_game() {
    // Arrange
    let file = StoryFile::write(SAMPLE_STORY_YAML, "yaml");
    let plan = ReplayPlan {
        path: vec![0],
        undo: 1,
        config: GameConfig::default(),
    };

    // Act
    let json = common::run_plan(&file, &plan, &mut MockRng);

    // Assert
    assert_eq!(json["view"]["over"], false);
    assert_eq!(json["view"]["history_len"], 0);
    assert_eq!(json["events"][1]["event_type"], "game.choice_undone");
}

#[test]
fn test_invalid_story_file_is_rejected_on_load() {
    // Arrange
    let file = StoryFile::write(
        "steps:\n  - options:\n      - label: Go\n        changes: { ghost: 1 }\n",
        "yaml",
    );

    // Act
    let result = load_story(&file.path);

    // Assert
    let err = AppError::from(result.unwrap_err());
    assert!(matches!(err, AppError::Content(ContentError::Invalid(_))));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_pick_after_game_over_is_a_domain_error() {
    // Arrange
    let file = StoryFile::write(JSON_STORY, "json");
    let loaded = load_story(&file.path).unwrap();

    // Act
    let result = replay(
        loaded.definition,
        &plan(&[1, 0]),
        common::fixed_clock(),
        &mut MockRng,
    );

    // Assert
    let err = result.unwrap_err();
    assert_eq!(err.code(), "game_over");
    assert_eq!(err.exit_code(), 4);
}
