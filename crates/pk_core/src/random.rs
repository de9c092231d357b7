//! Random source abstraction
//!
//! The outcome model consumes uniform draws through `RandomSource` so tests
//! can substitute scripted values. The production implementation wraps
//! `ChaCha8Rng`: same seed, same session.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplier of uniform draws in [0, 1).
pub trait RandomSource {
    fn next_uniform(&mut self) -> f32;

    /// Uniform draw in [0, bound).
    fn next_bounded(&mut self, bound: f32) -> f32 {
        self.next_uniform() * bound
    }

    /// Uniform pick of an index in 0..len. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let idx = (self.next_uniform() * len as f32) as usize;
        idx.min(len - 1)
    }
}

/// Seeded deterministic source backing live sessions.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_uniform(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays a fixed script of draws, then repeats the last one.
///
/// Test-only in spirit, but exported so downstream harnesses can pin
/// outcomes without a seed hunt.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty(), "scripted source needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Source that returns `value` forever.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_uniform(&mut self) -> f32 {
        let v = self.values[self.cursor.min(self.values.len() - 1)];
        self.cursor += 1;
        v
    }
}
