//! Torque accumulator and beam angle

use serde::{Deserialize, Serialize};

use super::shape::Side;
use crate::consts::{ANGLE_PER_TORQUE, LANDING_IMPULSE, TORQUE_LIMIT};

/// Signed net load on the beam. Right is positive, left is negative.
///
/// The stored value is clamped after every adjustment, so saturation drops the
/// excess for good: removing weight later does not restore the prior balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TorqueEngine {
    torque: f32,
}

impl TorqueEngine {
    pub fn new() -> Self {
        Self { torque: 0.0 }
    }

    /// Add `delta`, clamp to ±TORQUE_LIMIT, return the new value
    pub fn adjust(&mut self, delta: f32) -> f32 {
        self.torque = (self.torque + delta).clamp(-TORQUE_LIMIT, TORQUE_LIMIT);
        self.torque
    }

    #[inline]
    pub fn torque(&self) -> f32 {
        self.torque
    }

    /// Beam rotation in degrees
    pub fn current_angle(&self) -> f32 {
        self.torque.clamp(-TORQUE_LIMIT, TORQUE_LIMIT) * ANGLE_PER_TORQUE
    }

    /// One-shot beam nudge for a shape starting its descent on `side`.
    /// Purely visual: the accumulator is not touched.
    pub fn landing_impulse(side: Side) -> f32 {
        side.sign() * LANDING_IMPULSE
    }

    pub fn reset(&mut self) {
        self.torque = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAX_ANGLE: f32 = TORQUE_LIMIT * ANGLE_PER_TORQUE;

    #[test]
    fn test_adjust_returns_clamped() {
        let mut engine = TorqueEngine::new();
        assert_eq!(engine.adjust(1.0), 1.0);
        assert_eq!(engine.adjust(10.0), TORQUE_LIMIT);
        assert_eq!(engine.adjust(-20.0), -TORQUE_LIMIT);
    }

    #[test]
    fn test_angle_pins_at_saturation() {
        let mut engine = TorqueEngine::new();
        engine.adjust(100.0);
        assert!((engine.current_angle() - 14.7).abs() < 1e-4);
        engine.adjust(-200.0);
        assert!((engine.current_angle() + 14.7).abs() < 1e-4);
    }

    #[test]
    fn test_saturation_is_not_recovered() {
        let mut engine = TorqueEngine::new();
        engine.adjust(3.0);
        engine.adjust(3.0); // clamps to 3.5, 2.5 of excess discarded
        engine.adjust(-3.0);
        assert!((engine.torque() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_landing_impulse_signed_by_side() {
        let before = TorqueEngine::new();
        assert_eq!(TorqueEngine::landing_impulse(Side::Left), -LANDING_IMPULSE);
        assert_eq!(TorqueEngine::landing_impulse(Side::Right), LANDING_IMPULSE);
        assert_eq!(before.torque(), 0.0);
    }

    proptest! {
        #[test]
        fn angle_always_bounded(deltas in prop::collection::vec(-10.0f32..10.0, 0..64)) {
            let mut engine = TorqueEngine::new();
            for d in deltas {
                let t = engine.adjust(d);
                prop_assert!(t.abs() <= TORQUE_LIMIT);
                prop_assert!(engine.current_angle().abs() <= MAX_ANGLE + 1e-4);
            }
        }
    }
}
