//! Shared test doubles and fixtures for the Branchline narrative engine.

mod clock;
mod rng;
mod story;
mod subscriber;

pub use clock::{FixedClock, fixed_now};
pub use rng::{MockRng, SequenceRng};
pub use story::{SAMPLE_STORY_YAML, sample_story};
pub use subscriber::RecordingSubscriber;
