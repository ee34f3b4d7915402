//! Tween facility seam
//!
//! The simulation never interpolates anything itself. It asks a
//! [`TweenFacility`] to animate properties and to call it back later; the
//! callbacks are [`Cue`] values handed back to the scene when due.
//!
//! - `ease`: easing curves
//! - `timeline`: deterministic in-process facility used by hosts and tests

pub mod ease;
pub mod timeline;

pub use ease::Ease;
pub use timeline::Timeline;

use serde::{Deserialize, Serialize};

use crate::sim::{FixedAnchor, ShapeId};

/// What a tween animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// The rotating beam
    Beam,
    /// A shape's visual element
    Shape(ShapeId),
}

/// Animatable property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Prop {
    /// Horizontal translation (px)
    X,
    /// Vertical translation (px)
    Y,
    /// Rotation (degrees)
    Rotation,
    /// 0 = transparent, 1 = opaque
    Opacity,
}

/// End value of a property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Goal {
    /// Absolute value
    To(f32),
    /// Relative to the value when the tween is issued
    By(f32),
}

/// Continuation carried by a tween or delayed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Drop one of the fixed anchor shapes
    DropFixed { generation: u32, anchor: FixedAnchor },
    /// Activate the spawner
    StartSpawning { generation: u32 },
    /// Spawn the next random shape
    SpawnNext { generation: u32 },
    DescentStarted(ShapeId),
    DescentFinished(ShapeId),
    BounceFinished(ShapeId),
    FallFinished(ShapeId),
}

/// Handle for an issued tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TweenId(pub u64);

/// A request to interpolate properties of one target
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: Target,
    pub goals: Vec<(Prop, Goal)>,
    pub duration: f32,
    pub ease: Ease,
    pub on_start: Option<Cue>,
    pub on_complete: Option<Cue>,
    /// Supersede in-flight tweens on the same target and properties
    pub overwrite: bool,
    /// Play every other repeat backwards
    pub yoyo: bool,
    /// Extra plays after the first
    pub repeat: u32,
}

impl Tween {
    pub fn new(target: Target, duration: f32, ease: Ease) -> Self {
        Self {
            target,
            goals: Vec::new(),
            duration,
            ease,
            on_start: None,
            on_complete: None,
            overwrite: false,
            yoyo: false,
            repeat: 0,
        }
    }

    pub fn to(mut self, prop: Prop, value: f32) -> Self {
        self.goals.push((prop, Goal::To(value)));
        self
    }

    pub fn by(mut self, prop: Prop, delta: f32) -> Self {
        self.goals.push((prop, Goal::By(delta)));
        self
    }

    pub fn on_start(mut self, cue: Cue) -> Self {
        self.on_start = Some(cue);
        self
    }

    pub fn on_complete(mut self, cue: Cue) -> Self {
        self.on_complete = Some(cue);
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.yoyo = true;
        self.repeat = repeat;
        self
    }
}

/// Animation and timer capability the simulation runs against.
///
/// Implementations must hand back each `on_start`/`on_complete` cue at most
/// once, and a tween issued with `overwrite` must win over older tweens on
/// the same target and property.
pub trait TweenFacility {
    /// Jump a property to `value` immediately
    fn set(&mut self, target: Target, prop: Prop, value: f32);

    /// Start interpolating properties
    fn animate(&mut self, tween: Tween) -> TweenId;

    /// Hand `cue` back once `delay` seconds have passed
    fn schedule(&mut self, delay: f32, cue: Cue);

    /// Current (possibly mid-tween) value of a property
    fn value(&self, target: Target, prop: Prop) -> f32;

    /// Drop a target's tweens and stored properties once its element is gone
    fn release(&mut self, target: Target);

    /// Cancel every tween and delayed call
    fn clear(&mut self);
}
