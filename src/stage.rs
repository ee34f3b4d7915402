//! Frame driver
//!
//! Ties a `Scene` to a `Timeline` and a seeded RNG. Each frame advances the
//! timeline, feeds due cues back into the scene in order, then runs the
//! edge check.

use rand_pcg::Pcg32;

use crate::anim::Timeline;
use crate::config::SceneConfig;
use crate::sim::{RngState, Scene, SceneEvent, TrackProbe};

/// Longest frame delta accepted; longer gaps (tab in background) are cut short
pub const MAX_FRAME_DT: f32 = 0.1;

/// Delay between `Stage::new` and the first scene reset
pub const START_DELAY: f32 = 1.0;

pub struct Stage {
    scene: Scene,
    timeline: Timeline,
    rng: Pcg32,
    rng_state: RngState,
    /// Seconds until the scene starts, if it has not yet
    start_in: Option<f32>,
    frames: u64,
}

impl Stage {
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            scene: Scene::new(config),
            timeline: Timeline::new(),
            rng: rng_state.to_rng(),
            rng_state,
            start_in: Some(START_DELAY),
            frames: 0,
        }
    }

    /// Reset the scene now instead of waiting for the start delay
    pub fn reset(&mut self) {
        self.start_in = None;
        self.scene.reset(&mut self.timeline);
    }

    /// Advance one rendered frame
    pub fn frame(&mut self, dt: f32, probe: &dyn TrackProbe) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.frames += 1;

        if let Some(remaining) = self.start_in {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.start_in = Some(remaining);
                return;
            }
            self.reset();
        }

        for cue in self.timeline.advance(dt) {
            self.scene.handle(cue, &mut self.timeline, &mut self.rng);
        }
        self.scene.check_edges(probe, &mut self.timeline);
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.scene.drain_events()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Current animated property values
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_started(&self) -> bool {
        self.start_in.is_none()
    }
}
