//! Resting-shape registry
//!
//! Holds the shapes currently on the beam in landing order. Every mutation
//! updates the torque accumulator and re-runs the slide resolver before
//! returning, so no two mutations ever interleave.

use serde::{Deserialize, Serialize};

use super::placement;
use super::shape::{Lifecycle, Shape, ShapeId};
use super::torque::TorqueEngine;
use crate::anim::TweenFacility;
use crate::consts::MAX_RESTING;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeRegistry {
    /// Landing order, oldest first
    resting: Vec<Shape>,
    capacity: usize,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new(MAX_RESTING)
    }
}

impl ShapeRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            resting: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Put a landed shape on the beam.
    ///
    /// Returns the shape that must fall to bring the registry back under
    /// capacity: the oldest one that is neither fixed nor already falling.
    pub fn register(
        &mut self,
        mut shape: Shape,
        torque: &mut TorqueEngine,
        fx: &mut dyn TweenFacility,
    ) -> Option<ShapeId> {
        shape.state = Lifecycle::Landed;
        let delta = shape.torque();
        self.resting.push(shape);

        torque.adjust(delta);
        placement::recompute(torque.current_angle(), &mut self.resting, fx);

        if self.resting.len() > self.capacity {
            self.resting.iter().find(|s| s.can_fall()).map(|s| s.id)
        } else {
            None
        }
    }

    /// Take a shape off the beam and withdraw its torque.
    ///
    /// Unknown ids are ignored, so evicting twice is harmless.
    pub fn evict(
        &mut self,
        id: ShapeId,
        torque: &mut TorqueEngine,
        fx: &mut dyn TweenFacility,
    ) -> Option<Shape> {
        let index = self.resting.iter().position(|s| s.id == id)?;
        let shape = self.resting.remove(index);

        torque.adjust(-shape.torque());
        placement::recompute(torque.current_angle(), &mut self.resting, fx);

        Some(shape)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.resting.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.resting.iter()
    }

    pub fn len(&self) -> usize {
        self.resting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resting.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.resting.clear();
    }
}
