//! Drop/fall state machine
//!
//! A `Scene` owns every piece of simulation state: the torque accumulator,
//! the resting registry, the pools of descending and falling shapes, and
//! the spawner. Each shape lives in exactly one pool at a time and moves
//! between them as it goes `Descending -> Landed -> Falling -> Removed`.
//!
//! Transitions are driven by [`Cue`]s handed back from the tween facility;
//! every side effect of a transition happens inside the call that handles
//! its cue, so the timeline never observes a half-applied mutation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::probe::TrackProbe;
use super::random::RandomSource;
use super::registry::ShapeRegistry;
use super::shape::{FixedAnchor, Lifecycle, Shape, ShapeId, ShapeKind, ShapeSize, ShapeSpec, Side};
use super::spawner::Spawner;
use super::torque::TorqueEngine;
use crate::anim::{Cue, Ease, Prop, Target, Tween, TweenFacility};
use crate::config::SceneConfig;
use crate::consts::*;

/// Something a host renderer needs to mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Scene was reset; every element should be detached
    Cleared,
    /// A new shape started descending; create its element
    Spawned(Shape),
    /// Shape came to rest on the beam
    Landed(ShapeId),
    /// Shape left the beam and started falling
    Evicted(ShapeId),
    /// Fall animation finished; detach the element
    Removed(ShapeId),
}

/// Owns every piece of simulation state except pending transitions, which
/// live in the tween facility as cues. A copy only resumes when cloned along
/// with the facility that holds them.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    torque: TorqueEngine,
    registry: ShapeRegistry,
    /// Shapes still in their descent or landing bounce
    descending: Vec<Shape>,
    /// Evicted shapes playing their exit animation
    falling: Vec<Shape>,
    spawner: Spawner,
    /// Bumped on every reset; sequencing cues from older generations are dropped
    generation: u32,
    removed: u32,
    next_id: u32,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let registry = ShapeRegistry::new(config.capacity);
        Self {
            config,
            torque: TorqueEngine::new(),
            registry,
            descending: Vec::new(),
            falling: Vec::new(),
            spawner: Spawner::new(),
            generation: 0,
            removed: 0,
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Clear the beam and queue the start sequence: the two fixed anchors,
    /// then the random stream.
    pub fn reset(&mut self, fx: &mut dyn TweenFacility) {
        fx.clear();
        for shape in self.registry.iter().chain(&self.descending).chain(&self.falling) {
            fx.release(Target::Shape(shape.id));
        }
        self.registry.clear();
        self.descending.clear();
        self.falling.clear();
        self.torque.reset();
        self.spawner.stop();
        self.generation += 1;
        fx.set(Target::Beam, Prop::Rotation, 0.0);
        self.events.push(SceneEvent::Cleared);

        let generation = self.generation;
        fx.schedule(
            self.config.brand_delay,
            Cue::DropFixed {
                generation,
                anchor: FixedAnchor::Brand,
            },
        );
        fx.schedule(
            self.config.graphic_delay,
            Cue::DropFixed {
                generation,
                anchor: FixedAnchor::Graphic,
            },
        );
        fx.schedule(self.config.spawn_start_delay, Cue::StartSpawning { generation });

        log::info!("Scene reset (generation {})", generation);
    }

    /// Apply a due continuation
    pub fn handle(&mut self, cue: Cue, fx: &mut dyn TweenFacility, rng: &mut dyn RandomSource) {
        match cue {
            Cue::DropFixed { generation, anchor } => {
                if generation == self.generation {
                    self.drop_shape(anchor.spec(), fx, rng);
                }
            }
            Cue::StartSpawning { generation } => {
                if generation == self.generation {
                    self.spawner.start();
                    self.spawn_next(fx, rng);
                }
            }
            Cue::SpawnNext { generation } => {
                if generation == self.generation && self.spawner.is_active() {
                    self.spawn_next(fx, rng);
                }
            }
            Cue::DescentStarted(id) => self.on_descent_started(id, fx),
            Cue::DescentFinished(id) => self.on_descent_finished(id, fx),
            Cue::BounceFinished(id) => self.on_bounce_finished(id, fx),
            Cue::FallFinished(id) => self.on_fall_finished(id, fx),
        }
    }

    /// Stop the random stream; shapes already in flight finish normally
    pub fn stop_spawning(&mut self) {
        self.spawner.stop();
    }

    fn spawn_next(&mut self, fx: &mut dyn TweenFacility, rng: &mut dyn RandomSource) {
        let spec = self.spawner.next_spec(&self.config, rng);
        self.drop_shape(spec, fx, rng);

        let delay = self.spawner.next_delay(&self.config, rng);
        fx.schedule(
            delay,
            Cue::SpawnNext {
                generation: self.generation,
            },
        );
    }

    /// Create a shape above the beam and start its descent
    pub fn drop_shape(
        &mut self,
        spec: ShapeSpec,
        fx: &mut dyn TweenFacility,
        rng: &mut dyn RandomSource,
    ) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;

        let anchor_percent = spec.anchor.unwrap_or_else(|| {
            let band = match spec.side {
                Side::Left => self.config.left_band,
                Side::Right => self.config.right_band,
            };
            rng.random_between(band.min, band.max)
        });
        let size = self.dimensions(spec.size, spec.kind, rng);

        let shape = Shape {
            id,
            side: spec.side,
            weight: spec.weight,
            base_offset: 0.0,
            fixed: spec.fixed,
            state: Lifecycle::Descending,
            label: spec.label,
            kind: spec.kind,
            size_class: spec.size,
            anchor_percent,
            size,
        };

        let target = Target::Shape(id);
        let wobble_from = rng.random_between(-8.0, 8.0);
        let wobble_to = rng.random_between(-4.0, 4.0);
        let duration = match spec.size {
            ShapeSize::Big => DESCENT_DURATION_BIG,
            ShapeSize::Small => DESCENT_DURATION_SMALL,
        };

        fx.set(target, Prop::X, 0.0);
        fx.set(target, Prop::Y, -DROP_HEIGHT);
        fx.set(target, Prop::Opacity, 0.0);
        fx.set(target, Prop::Rotation, wobble_from);
        fx.animate(
            Tween::new(target, duration, Ease::Power2In)
                .to(Prop::Y, 0.0)
                .to(Prop::Opacity, 1.0)
                .to(Prop::Rotation, wobble_to)
                .overwrite()
                .on_start(Cue::DescentStarted(id))
                .on_complete(Cue::DescentFinished(id)),
        );

        log::debug!(
            "spawn {:?}: {:?} weight {:.2} at {:.1}%{}",
            id,
            shape.side,
            shape.weight,
            anchor_percent,
            if shape.fixed { " (fixed)" } else { "" }
        );
        self.events.push(SceneEvent::Spawned(shape.clone()));
        self.descending.push(shape);
        id
    }

    fn dimensions(&self, size: ShapeSize, kind: ShapeKind, rng: &mut dyn RandomSource) -> Vec2 {
        match (size, kind) {
            (ShapeSize::Big, _) => {
                let s = rng.random_between(self.config.big_size.min, self.config.big_size.max);
                Vec2::splat(s)
            }
            (ShapeSize::Small, ShapeKind::Circle) => {
                let d = rng.random_between(self.config.circle_size.min, self.config.circle_size.max);
                Vec2::splat(d)
            }
            (ShapeSize::Small, ShapeKind::Square) => {
                let span = self.config.square_size;
                let w = rng.random_between(span.min, span.max);
                let h = rng.random_between(span.min, span.max);
                Vec2::new(w, h)
            }
        }
    }

    fn descending_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.descending.iter().find(|s| s.id == id)
    }

    /// Landing shock: nudge the beam toward the incoming side
    fn on_descent_started(&mut self, id: ShapeId, fx: &mut dyn TweenFacility) {
        let Some(shape) = self.descending_shape(id) else {
            return;
        };
        fx.animate(
            Tween::new(Target::Beam, IMPULSE_DURATION, Ease::Power1Out)
                .by(Prop::Rotation, TorqueEngine::landing_impulse(shape.side))
                .overwrite(),
        );
    }

    fn on_descent_finished(&mut self, id: ShapeId, fx: &mut dyn TweenFacility) {
        if self.descending_shape(id).is_none() {
            return;
        }
        fx.animate(
            Tween::new(Target::Shape(id), BOUNCE_DURATION, Ease::Power1Out)
                .to(Prop::Y, -BOUNCE_HEIGHT)
                .yoyo(1)
                .overwrite()
                .on_complete(Cue::BounceFinished(id)),
        );
    }

    fn on_bounce_finished(&mut self, id: ShapeId, fx: &mut dyn TweenFacility) {
        let Some(index) = self.descending.iter().position(|s| s.id == id) else {
            return;
        };
        let shape = self.descending.remove(index);

        log::debug!("land {:?}: torque {:+.2}", id, shape.torque());
        self.events.push(SceneEvent::Landed(id));

        if let Some(victim) = self.registry.register(shape, &mut self.torque, fx) {
            log::debug!("capacity exceeded, pushing off {:?}", victim);
            self.fall_off(victim, fx);
        }
    }

    /// Push a resting shape off the beam.
    ///
    /// Its torque is withdrawn before the exit animation starts. Fixed shapes,
    /// shapes not resting and unknown ids are left alone; returns whether the
    /// shape started falling.
    pub fn fall_off(&mut self, id: ShapeId, fx: &mut dyn TweenFacility) -> bool {
        if !self.registry.get(id).is_some_and(Shape::can_fall) {
            return false;
        }
        let Some(mut shape) = self.registry.evict(id, &mut self.torque, fx) else {
            return false;
        };
        shape.state = Lifecycle::Falling;

        fx.animate(
            Tween::new(Target::Shape(id), FALL_DURATION, Ease::Power2In)
                .by(Prop::Y, FALL_DISTANCE)
                .to(Prop::Rotation, shape.side.sign() * FALL_TILT)
                .to(Prop::Opacity, 0.0)
                .overwrite()
                .on_complete(Cue::FallFinished(id)),
        );

        log::debug!("fall {:?}: torque now {:+.2}", id, self.torque.torque());
        self.events.push(SceneEvent::Evicted(id));
        self.falling.push(shape);
        true
    }

    fn on_fall_finished(&mut self, id: ShapeId, fx: &mut dyn TweenFacility) {
        let Some(index) = self.falling.iter().position(|s| s.id == id) else {
            return;
        };
        let mut shape = self.falling.remove(index);
        shape.state = Lifecycle::Removed;
        fx.release(Target::Shape(id));
        self.removed += 1;

        log::debug!("remove {:?}", shape.id);
        self.events.push(SceneEvent::Removed(id));
    }

    /// Per-frame check: push off any resting shape that slid out of view
    pub fn check_edges(&mut self, probe: &dyn TrackProbe, fx: &mut dyn TweenFacility) {
        let off: Vec<ShapeId> = self
            .registry
            .iter()
            .filter(|s| s.can_fall() && probe.is_off_track(s))
            .map(|s| s.id)
            .collect();

        for id in off {
            log::debug!("edge-off {:?}", id);
            self.fall_off(id, fx);
        }
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Where a shape is in its lifecycle; `None` once removed or never known
    pub fn lifecycle(&self, id: ShapeId) -> Option<Lifecycle> {
        self.shape(id).map(|s| s.state)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.registry
            .get(id)
            .or_else(|| self.descending_shape(id))
            .or_else(|| self.falling.iter().find(|s| s.id == id))
    }

    pub fn torque(&self) -> f32 {
        self.torque.torque()
    }

    /// Beam angle in degrees
    pub fn angle(&self) -> f32 {
        self.torque.current_angle()
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn descending(&self) -> &[Shape] {
        &self.descending
    }

    pub fn falling(&self) -> &[Shape] {
        &self.falling
    }

    /// Shapes whose exit animation has completed
    pub fn removed_count(&self) -> u32 {
        self.removed
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::Timeline;
    use crate::sim::probe::NeverOffTrack;
    use crate::sim::random::ScriptedRandom;

    const DT: f32 = 1.0 / 60.0;

    /// Advance the timeline and feed every cue back into the scene
    fn pump(scene: &mut Scene, tl: &mut Timeline, rng: &mut ScriptedRandom, seconds: f32) {
        let frames = (seconds / DT).ceil() as u32;
        for _ in 0..frames {
            for cue in tl.advance(DT) {
                scene.handle(cue, tl, rng);
            }
            scene.check_edges(&NeverOffTrack, tl);
        }
    }

    struct AlwaysOffTrack;

    impl TrackProbe for AlwaysOffTrack {
        fn is_off_track(&self, _shape: &Shape) -> bool {
            true
        }
    }

    fn setup() -> (Scene, Timeline, ScriptedRandom) {
        (
            Scene::new(SceneConfig::default()),
            Timeline::new(),
            ScriptedRandom::midpoint(),
        )
    }

    #[test]
    fn test_descent_lands_and_registers() {
        let (mut scene, mut tl, mut rng) = setup();
        let id = scene.drop_shape(ShapeSpec::new(Side::Right, 1.0), &mut tl, &mut rng);
        assert_eq!(scene.lifecycle(id), Some(Lifecycle::Descending));
        assert_eq!(scene.torque(), 0.0);

        pump(&mut scene, &mut tl, &mut rng, 1.1);
        // Bouncing: not registered yet
        assert_eq!(scene.lifecycle(id), Some(Lifecycle::Descending));
        assert_eq!(scene.torque(), 0.0);

        pump(&mut scene, &mut tl, &mut rng, 0.5);
        assert_eq!(scene.lifecycle(id), Some(Lifecycle::Landed));
        assert!((scene.torque() - 1.0).abs() < 1e-6);
        assert!((scene.angle() - 4.2).abs() < 1e-5);
        let offset = scene.shape(id).map(|s| s.base_offset).unwrap_or_default();
        assert!((offset - 4.2 * 0.52).abs() < 1e-5);

        let events = scene.drain_events();
        assert!(matches!(events[0], SceneEvent::Spawned(ref s) if s.id == id));
        assert_eq!(events[1], SceneEvent::Landed(id));
    }

    #[test]
    fn test_descent_start_nudges_beam_only() {
        let (mut scene, mut tl, mut rng) = setup();
        scene.drop_shape(ShapeSpec::new(Side::Left, 1.0), &mut tl, &mut rng);
        pump(&mut scene, &mut tl, &mut rng, 0.6);
        assert!((tl.value(Target::Beam, Prop::Rotation) + LANDING_IMPULSE).abs() < 1e-4);
        assert_eq!(scene.torque(), 0.0);
    }

    #[test]
    fn test_fixed_anchors_balance_beam() {
        let (mut scene, mut tl, mut rng) = setup();
        scene.drop_shape(FixedAnchor::Brand.spec(), &mut tl, &mut rng);
        scene.drop_shape(FixedAnchor::Graphic.spec(), &mut tl, &mut rng);
        pump(&mut scene, &mut tl, &mut rng, 2.0);

        assert_eq!(scene.registry().len(), 2);
        assert!(scene.torque().abs() < 1e-6);
        assert!(scene.angle().abs() < 1e-5);
    }

    #[test]
    fn test_twelfth_shape_pushes_first_off() {
        let (mut scene, mut tl, mut rng) = setup();
        let ids: Vec<ShapeId> = (0..12)
            .map(|_| scene.drop_shape(ShapeSpec::new(Side::Right, 1.0), &mut tl, &mut rng))
            .collect();
        pump(&mut scene, &mut tl, &mut rng, 1.5);

        assert_eq!(scene.registry().len(), 11);
        assert_eq!(scene.lifecycle(ids[0]), Some(Lifecycle::Falling));
        for id in &ids[1..] {
            assert_eq!(scene.lifecycle(*id), Some(Lifecycle::Landed));
        }
        let evictions: Vec<_> = scene
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SceneEvent::Evicted(_)))
            .collect();
        assert_eq!(evictions, vec![SceneEvent::Evicted(ids[0])]);

        pump(&mut scene, &mut tl, &mut rng, 1.0);
        assert_eq!(scene.lifecycle(ids[0]), None);
        assert_eq!(scene.removed_count(), 1);
        assert_eq!(scene.registry().len(), 11);
    }

    #[test]
    fn test_fixed_shapes_survive_capacity_and_edges() {
        let (mut scene, mut tl, mut rng) = setup();
        let brand = scene.drop_shape(FixedAnchor::Brand.spec(), &mut tl, &mut rng);
        pump(&mut scene, &mut tl, &mut rng, 2.0);
        for _ in 0..11 {
            scene.drop_shape(ShapeSpec::new(Side::Left, 0.5), &mut tl, &mut rng);
        }
        pump(&mut scene, &mut tl, &mut rng, 1.5);

        assert_eq!(scene.lifecycle(brand), Some(Lifecycle::Landed));
        assert_eq!(scene.falling().len(), 1);
        assert_eq!(scene.falling()[0].id, ShapeId(brand.0 + 1));

        scene.check_edges(&AlwaysOffTrack, &mut tl);
        assert_eq!(scene.registry().len(), 1);
        assert_eq!(scene.lifecycle(brand), Some(Lifecycle::Landed));
        assert!(!scene.fall_off(brand, &mut tl));
    }

    #[test]
    fn test_fall_off_is_idempotent() {
        let (mut scene, mut tl, mut rng) = setup();
        let a = scene.drop_shape(ShapeSpec::new(Side::Left, 1.0), &mut tl, &mut rng);
        let b = scene.drop_shape(ShapeSpec::new(Side::Right, 0.5), &mut tl, &mut rng);
        pump(&mut scene, &mut tl, &mut rng, 1.5);
        assert!((scene.torque() + 0.5).abs() < 1e-6);

        assert!(scene.fall_off(a, &mut tl));
        let torque = scene.torque();
        assert!((torque - 0.5).abs() < 1e-6);

        assert!(!scene.fall_off(a, &mut tl));
        scene.check_edges(&NeverOffTrack, &mut tl);
        assert_eq!(scene.torque(), torque);
        assert_eq!(scene.falling().len(), 1);
        assert_eq!(scene.lifecycle(b), Some(Lifecycle::Landed));

        // Stale fall cue for a shape never falling
        scene.handle(Cue::FallFinished(b), &mut tl, &mut rng);
        assert_eq!(scene.lifecycle(b), Some(Lifecycle::Landed));
    }

    #[test]
    fn test_edge_check_ignores_descending() {
        let (mut scene, mut tl, mut rng) = setup();
        let id = scene.drop_shape(ShapeSpec::new(Side::Left, 1.0), &mut tl, &mut rng);
        scene.check_edges(&AlwaysOffTrack, &mut tl);
        assert_eq!(scene.lifecycle(id), Some(Lifecycle::Descending));
    }

    #[test]
    fn test_reset_runs_start_sequence() {
        let (mut scene, mut tl, mut rng) = setup();
        scene.reset(&mut tl);
        assert_eq!(scene.generation(), 1);

        pump(&mut scene, &mut tl, &mut rng, 0.9);
        assert_eq!(scene.descending().len(), 1);
        assert_eq!(scene.descending()[0].anchor_percent, 28.0);

        // Brand rests at ~2.36s, Graphic still descending
        pump(&mut scene, &mut tl, &mut rng, 1.6);
        assert_eq!(scene.registry().len(), 1);
        assert_eq!(scene.descending().len(), 1);
        assert!(!scene.spawner().is_active());
        assert!((scene.torque() + ANCHOR_WEIGHT).abs() < 1e-6);

        // Graphic rests at ~3.36s; the first random shape is still in the air
        pump(&mut scene, &mut tl, &mut rng, 1.0);
        assert!(scene.spawner().is_active());
        assert_eq!(scene.registry().len(), 2);
        assert!(scene.torque().abs() < 1e-6);

        pump(&mut scene, &mut tl, &mut rng, 10.0);
        assert!(scene.spawner().spawned() > 5);
    }

    #[test]
    fn test_reset_discards_previous_generation() {
        let (mut scene, mut tl, mut rng) = setup();
        scene.reset(&mut tl);
        pump(&mut scene, &mut tl, &mut rng, 5.0);
        assert!(scene.spawner().spawned() > 0);

        let stale = Cue::SpawnNext {
            generation: scene.generation(),
        };
        scene.reset(&mut tl);
        assert_eq!(scene.registry().len(), 0);
        assert_eq!(scene.torque(), 0.0);
        assert_eq!(tl.value(Target::Beam, Prop::Rotation), 0.0);

        let spawned = scene.spawner().spawned();
        scene.handle(stale, &mut tl, &mut rng);
        assert_eq!(scene.spawner().spawned(), spawned);
        assert!(scene.drain_events().contains(&SceneEvent::Cleared));
    }

    #[test]
    fn test_cloned_with_timeline_resumes_identically() {
        let config = SceneConfig::default();
        let mut scene = Scene::new(config);
        let mut tl = Timeline::new();
        let mut rng = ScriptedRandom::new(vec![0.1, 0.7, 0.4, 0.9, 0.25, 0.6]);
        scene.reset(&mut tl);
        pump(&mut scene, &mut tl, &mut rng, 6.5);
        assert!(!scene.descending().is_empty() || tl.pending_calls() > 0);

        let mut fork = scene.clone();
        let mut fork_tl = tl.clone();
        let mut fork_rng = rng.clone();

        pump(&mut scene, &mut tl, &mut rng, 20.0);
        pump(&mut fork, &mut fork_tl, &mut fork_rng, 20.0);

        assert_eq!(fork.spawner().spawned(), scene.spawner().spawned());
        assert_eq!(fork.torque(), scene.torque());
        assert_eq!(fork.removed_count(), scene.removed_count());
        let ids = |s: &Scene| s.registry().iter().map(|r| (r.id, r.base_offset)).collect::<Vec<_>>();
        assert_eq!(ids(&fork), ids(&scene));
        assert!(scene.spawner().spawned() > 10);
    }

    #[test]
    fn test_stop_spawning() {
        let (mut scene, mut tl, mut rng) = setup();
        scene.reset(&mut tl);
        pump(&mut scene, &mut tl, &mut rng, 4.0);
        scene.stop_spawning();
        let spawned = scene.spawner().spawned();
        pump(&mut scene, &mut tl, &mut rng, 5.0);
        assert_eq!(scene.spawner().spawned(), spawned);
    }
}
