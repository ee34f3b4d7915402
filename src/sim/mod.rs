//! Deterministic simulation module
//!
//! All seesaw logic lives here. This module must stay renderer-agnostic:
//! - Time only advances through cues from a `TweenFacility`
//! - Randomness only through an injected `RandomSource`
//! - Off-track detection only through a `TrackProbe`

pub mod placement;
pub mod probe;
pub mod random;
pub mod registry;
pub mod scene;
pub mod shape;
pub mod spawner;
pub mod torque;

pub use probe::{LayerBounds, NeverOffTrack, TrackProbe};
pub use random::{RandomSource, RngState, ScriptedRandom};
pub use registry::ShapeRegistry;
pub use scene::{Scene, SceneEvent};
pub use shape::{FixedAnchor, Lifecycle, Shape, ShapeId, ShapeKind, ShapeSize, ShapeSpec, Side};
pub use spawner::Spawner;
pub use torque::TorqueEngine;
