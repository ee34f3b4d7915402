//! Seesaw - A balance-beam drop visualization
//!
//! Core modules:
//! - `sim`: Deterministic simulation (torque, resting shapes, drop/fall lifecycle)
//! - `anim`: Tween facility seam and the in-process `Timeline` implementation
//! - `stage`: Frame driver tying the simulation to a timeline
//! - `config`: Data-driven scene tuning

pub mod anim;
pub mod config;
pub mod error;
pub mod sim;
pub mod stage;

pub use config::SceneConfig;
pub use error::{ConfigError, SetupError};
pub use stage::Stage;

/// Scene configuration constants
pub mod consts {
    /// Design canvas size; the host scales it to fit the viewport
    pub const BASE_WIDTH: f32 = 1920.0;
    pub const BASE_HEIGHT: f32 = 1080.0;

    /// Torque accumulator saturates at ±T_MAX
    pub const TORQUE_LIMIT: f32 = 3.5;
    /// Degrees of beam rotation per unit of torque
    pub const ANGLE_PER_TORQUE: f32 = 4.2;
    /// Beam nudge (degrees) when a shape starts its descent
    pub const LANDING_IMPULSE: f32 = 1.2;

    /// Resting shapes beyond this count push the oldest one off
    pub const MAX_RESTING: usize = 11;

    /// Offset gained per degree of tilt
    pub const SLIDE_PER_DEGREE: f32 = 0.52;
    /// Slide factor for shapes on the raised side
    pub const CROSS_SLIDE: f32 = 0.35;
    pub const FIXED_SLIDE_LIMIT: f32 = 170.0;
    pub const FREE_SLIDE_LIMIT: f32 = 300.0;

    /// Tween durations (seconds)
    pub const SLIDE_DURATION: f32 = 1.05;
    pub const BEAM_DURATION: f32 = 1.35;
    pub const IMPULSE_DURATION: f32 = 0.55;
    pub const DESCENT_DURATION_SMALL: f32 = 1.0;
    pub const DESCENT_DURATION_BIG: f32 = 1.2;
    pub const BOUNCE_DURATION: f32 = 0.18;
    pub const FALL_DURATION: f32 = 0.95;

    /// Descent starts this far above the beam (px)
    pub const DROP_HEIGHT: f32 = 260.0;
    /// Landing bounce height (px)
    pub const BOUNCE_HEIGHT: f32 = 10.0;
    /// Fall-off drop distance (px) and tilt (degrees)
    pub const FALL_DISTANCE: f32 = 260.0;
    pub const FALL_TILT: f32 = 18.0;

    /// Weight of each fixed anchor shape
    pub const ANCHOR_WEIGHT: f32 = 2.6;

    /// Edge-check inset from the drop layer bounds (px)
    pub const EDGE_PADDING: f32 = 10.0;
}

/// Uniform scale that fits the design canvas inside a viewport
#[inline]
pub fn fit_scale(viewport_w: f32, viewport_h: f32) -> f32 {
    (viewport_w / consts::BASE_WIDTH).min(viewport_h / consts::BASE_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_picks_tighter_axis() {
        assert!((fit_scale(1920.0, 1080.0) - 1.0).abs() < 1e-6);
        assert!((fit_scale(960.0, 1080.0) - 0.5).abs() < 1e-6);
        assert!((fit_scale(3840.0, 540.0) - 0.5).abs() < 1e-6);
    }
}
