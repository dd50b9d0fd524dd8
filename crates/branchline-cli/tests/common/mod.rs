//! Shared test helpers for CLI integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use branchline_cli::replay::{ReplayPlan, ReplayReport, replay, report};
use branchline_content::load_story;
use branchline_core::clock::Clock;
use branchline_core::rng::DeterministicRng;
use branchline_test_support::FixedClock;
use uuid::Uuid;

/// A story file in the system temp directory, removed on drop.
pub struct StoryFile {
    pub path: PathBuf,
}

impl StoryFile {
    /// Writes `source` to a fresh file with the given extension.
    pub fn write(source: &str, extension: &str) -> Self {
        let path = std::env::temp_dir().join(format!("branchline-{}.{extension}", Uuid::new_v4()));
        std::fs::write(&path, source).unwrap();
        Self { path }
    }
}

impl Drop for StoryFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Fixed clock used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::default())
}

/// Loads `file`, plays `plan` and returns the serialized report.
pub fn run_plan(
    file: &StoryFile,
    plan: &ReplayPlan,
    rng: &mut dyn DeterministicRng,
) -> serde_json::Value {
    let loaded = load_story(&file.path).unwrap();
    let (game, events) = replay(loaded.definition, plan, fixed_clock(), rng).unwrap();
    let report: ReplayReport = report(&game, &events, Some(loaded.version_hash));
    serde_json::to_value(report).unwrap()
}
