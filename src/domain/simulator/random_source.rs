use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sample space of every probability in the config: a probability `p` means `p / 1000`.
pub const PERMILLE: u64 = 1000;

/// Source of every random draw the simulation makes.
///
/// The simulation owns exactly one source, so a seeded source makes a run reproducible
/// and a scripted source lets tests force specific draws.
pub trait RandomSource: std::fmt::Debug {
    /// Uniform integer in `0..bound`. `bound` is at least 1.
    fn next_below(&mut self, bound: u64) -> u64;

    /// Uniform integer in `1..=1000`, the admission draw.
    fn draw_permille(&mut self) -> u64 {
        1 + self.next_below(PERMILLE)
    }

    /// `true` with probability `permille / 1000`.
    fn chance(&mut self, permille: u32) -> bool {
        self.next_below(PERMILLE) < u64::from(permille)
    }

    /// Uniform integer in `min..=max`. Requires `min <= max`; any width up to the full `i64` range.
    fn draw_inclusive(&mut self, min: i64, max: i64) -> i64 {
        let offset = match max.abs_diff(min).checked_add(1) {
            Some(span) => self.next_below(span),
            // min..=max covers every i64
            None => self.next_below(u64::MAX),
        };
        min.wrapping_add_unsigned(offset)
    }
}

/// [`StdRng`] backed source.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: StdRng::seed_from_u64(seed) }
    }

    /// Seeds from the thread rng. The chosen seed is available through [`SeededRandom::seed`]
    /// so the run can be replayed.
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: u64) -> u64 {
        self.rng.random_range(0..bound.max(1))
    }

    fn draw_inclusive(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max.max(min))
    }
}
