//! Easing curves
//!
//! Each curve maps normalized time `t` in [0, 1] to progress, with
//! `f(0) = 0` and `f(1) = 1`.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    /// Quadratic deceleration
    Power1Out,
    /// Cubic acceleration
    Power2In,
    /// Cubic deceleration
    Power2Out,
    /// Decaying oscillation that overshoots the goal before settling
    ElasticOut { amplitude: f32, period: f32 },
}

impl Ease {
    /// Beam rotation settle curve
    pub const BEAM: Ease = Ease::ElasticOut {
        amplitude: 1.0,
        period: 0.85,
    };

    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power2In => t.powi(3),
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
        }
    }
}

fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    // Amplitudes below 1 cannot reach the goal on the first swing
    let amplitude = amplitude.max(1.0);
    let shift = period / TAU * (1.0 / amplitude).asin();
    amplitude * 2f32.powf(-10.0 * t) * ((t - shift) * TAU / period).sin() + 1.0
}
