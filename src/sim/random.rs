//! Injected randomness
//!
//! Every random visual parameter (side, label, size, position, delay) is
//! drawn through [`RandomSource`] so a scene can be replayed exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

pub trait RandomSource {
    /// Uniform sample in `[min, max)`; returns `min` for an empty range
    fn random_between(&mut self, min: f32, max: f32) -> f32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.random_between(0.0, 1.0) < p
    }

    /// Uniform index into a collection of `len` items
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.random_between(0.0, 1.0) * len as f32) as usize).min(len - 1)
    }
}

impl RandomSource for Pcg32 {
    fn random_between(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.random_range(min..max)
    }
}

/// Seed wrapper for reproducible runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Replays a fixed list of unit samples, cycling when exhausted.
///
/// `random_between` maps each sample `u` to `min + u * (max - min)`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Always returns the midpoint of the requested range
    pub fn midpoint() -> Self {
        Self::new(vec![0.5])
    }
}

impl RandomSource for ScriptedRandom {
    fn random_between(&mut self, min: f32, max: f32) -> f32 {
        let u = if self.samples.is_empty() {
            0.5
        } else {
            let u = self.samples[self.cursor % self.samples.len()];
            self.cursor += 1;
            u
        };
        min + u.clamp(0.0, 1.0) * (max - min)
    }
}
