//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use tradegrader_core::rng::DeterministicRng;

/// An RNG that always returns the midpoint of the requested range, i.e. zero
/// jitter for the heuristic grader's symmetric range.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        min + (max - min) / 2
    }
}

/// An RNG that returns values from a predetermined sequence, clamped into the
/// requested range. Panics if the sequence is exhausted.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<i32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<i32>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        let val = self.values[self.index];
        self.index += 1;
        val.clamp(min, max)
    }
}
