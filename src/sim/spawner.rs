//! Random shape stream
//!
//! Once started, a new random shape is dropped after every randomized
//! delay. There is no backpressure; the registry's capacity eviction is what
//! bounds the number of shapes on the beam.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::shape::{ShapeKind, ShapeSize, ShapeSpec, Side};
use crate::config::SceneConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    active: bool,
    spawned: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Random shapes produced since creation
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Draw the next random shape
    pub fn next_spec(&mut self, config: &SceneConfig, rng: &mut dyn RandomSource) -> ShapeSpec {
        let side = if rng.chance(0.5) {
            Side::Left
        } else {
            Side::Right
        };

        let label = if rng.chance(config.label_chance) {
            let labels = match side {
                Side::Left => &config.left_labels,
                Side::Right => &config.right_labels,
            };
            labels.get(rng.pick(labels.len())).cloned()
        } else {
            None
        };

        let kind = if rng.chance(config.circle_chance) {
            ShapeKind::Circle
        } else {
            ShapeKind::Square
        };

        let weight = rng.random_between(config.weight.min, config.weight.max);

        self.spawned += 1;
        ShapeSpec {
            side,
            size: ShapeSize::Small,
            kind,
            label,
            weight,
            fixed: false,
            anchor: None,
        }
    }

    /// Seconds until the following spawn
    pub fn next_delay(&self, config: &SceneConfig, rng: &mut dyn RandomSource) -> f32 {
        rng.random_between(config.spawn_delay.min, config.spawn_delay.max)
    }
}
