use std::collections::VecDeque;

use crate::domain::simulator::random_source::RandomSource;

/// Replays a fixed list of raw draws, for tests that need to force outcomes.
///
/// Each call to [`RandomSource::next_below`] pops the next value and reduces it
/// modulo `bound`. Once the script is exhausted every call yields `fallback % bound`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<u64>,
    fallback: u64,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self { values: values.into_iter().collect(), fallback: 0 }
    }

    /// A source that always returns `value % bound`.
    pub fn constant(value: u64) -> Self {
        Self::new([]).with_fallback(value)
    }

    pub fn with_fallback(mut self, fallback: u64) -> Self {
        self.fallback = fallback;
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_below(&mut self, bound: u64) -> u64 {
        let value = self.values.pop_front().unwrap_or(self.fallback);
        value % bound.max(1)
    }
}
