//! Random number abstraction injected into the engine.
//! Production code draws from a `StdRng`; tests script the exact sequence of values.

use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in `[min, max)`. Callers guarantee `min < max`.
    fn next_in_range(&mut self, min: i32, max: i32) -> i32;
}

/// `StdRng`-backed source, either OS-seeded or seeded for reproducible sessions.
#[derive(Debug, Clone)]
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    pub fn new() -> Self { Self { rng: StdRng::from_entropy() } }
    pub fn seeded(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }
}

impl Default for SystemRandom {
    fn default() -> Self { Self::new() }
}

impl RandomSource for SystemRandom {
    fn next_in_range(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..max)
    }
}

/// Replays a fixed sequence of values, cycling when it runs out.
/// Values are returned as given, without checking them against the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<i32>,
    requests: Vec<(i32, i32)>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self { values: values.into_iter().collect(), requests: Vec::new() }
    }

    /// Ranges requested so far, in call order.
    pub fn requests(&self) -> &[(i32, i32)] { &self.requests }
}

impl RandomSource for ScriptedRandom {
    fn next_in_range(&mut self, min: i32, max: i32) -> i32 {
        self.requests.push((min, max));
        match self.values.pop_front() {
            Some(v) => {
                self.values.push_back(v);
                v
            }
            None => min,
        }
    }
}
