//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use branchline_core::rng::DeterministicRng;

/// A no-op RNG whose every draw is `0.0`. Every risk with positive odds
/// fires against it.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that returns draws from a predetermined sequence of values in
/// `[0, 1)`. Panics if the sequence is exhausted, which makes it useful for
/// asserting how many rolls a piece of code performs.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<f64>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given draws.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.index];
        self.index += 1;
        value
    }
}
