//! Shape entity and descriptors

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ANCHOR_WEIGHT;

/// Which half of the beam a shape drops onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 for Left, +1 for Right (positive angle tilts toward Right)
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Opaque shape identity, never reused within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// Outline drawn by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Square,
    Circle,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::Circle => "circle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeSize {
    #[default]
    Small,
    Big,
}

impl ShapeSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeSize::Small => "small",
            ShapeSize::Big => "big",
        }
    }
}

/// Lifecycle of a shape from spawn to removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Falling from above toward the beam
    Descending,
    /// Resting on the beam and contributing torque
    Landed,
    /// Evicted and playing its exit animation
    Falling,
    /// Exit animation finished, element detached
    Removed,
}

/// The two anchor shapes dropped at scene start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedAnchor {
    Brand,
    Graphic,
}

impl FixedAnchor {
    pub fn side(self) -> Side {
        match self {
            FixedAnchor::Brand => Side::Left,
            FixedAnchor::Graphic => Side::Right,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FixedAnchor::Brand => "Brand",
            FixedAnchor::Graphic => "Graphic",
        }
    }

    /// Horizontal anchor as a percentage of the drop layer width
    pub fn anchor_percent(self) -> f32 {
        match self {
            FixedAnchor::Brand => 28.0,
            FixedAnchor::Graphic => 72.0,
        }
    }

    /// Descriptor for dropping this anchor
    pub fn spec(self) -> ShapeSpec {
        ShapeSpec {
            side: self.side(),
            size: ShapeSize::Big,
            kind: ShapeKind::Square,
            label: Some(self.label().to_string()),
            weight: ANCHOR_WEIGHT,
            fixed: true,
            anchor: Some(self.anchor_percent()),
        }
    }
}

/// Parameters for a shape about to be dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub side: Side,
    pub size: ShapeSize,
    pub kind: ShapeKind,
    pub label: Option<String>,
    pub weight: f32,
    pub fixed: bool,
    /// Explicit anchor percentage; `None` picks one in the side's band
    pub anchor: Option<f32>,
}

impl ShapeSpec {
    /// A plain small square with no label
    pub fn new(side: Side, weight: f32) -> Self {
        Self {
            side,
            size: ShapeSize::Small,
            kind: ShapeKind::Square,
            label: None,
            weight,
            fixed: false,
            anchor: None,
        }
    }
}

/// A shape entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub side: Side,
    pub weight: f32,
    /// Horizontal displacement from the anchor, driven by beam tilt
    pub base_offset: f32,
    pub fixed: bool,
    pub state: Lifecycle,
    pub label: Option<String>,
    pub kind: ShapeKind,
    pub size_class: ShapeSize,
    /// Anchor position as a percentage of the drop layer width
    pub anchor_percent: f32,
    /// Rendered width/height in px
    pub size: Vec2,
}

impl Shape {
    /// Signed torque contribution while resting
    #[inline]
    pub fn torque(&self) -> f32 {
        self.side.sign() * self.weight
    }

    #[inline]
    pub fn is_resting(&self) -> bool {
        self.state == Lifecycle::Landed
    }

    /// Eligible for eviction or edge fall-off
    #[inline]
    pub fn can_fall(&self) -> bool {
        !self.fixed && self.state == Lifecycle::Landed
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Landed shape with no geometry, for registry and resolver tests
    pub fn landed(id: u32, side: Side, weight: f32, fixed: bool) -> Shape {
        Shape {
            id: ShapeId(id),
            side,
            weight,
            base_offset: 0.0,
            fixed,
            state: Lifecycle::Landed,
            label: None,
            kind: ShapeKind::Square,
            size_class: ShapeSize::Small,
            anchor_percent: 50.0,
            size: Vec2::new(100.0, 100.0),
        }
    }
}
