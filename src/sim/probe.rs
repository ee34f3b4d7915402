//! Off-track detection
//!
//! Whether a resting shape has slid out of view is a rendering question, so
//! the scene asks a [`TrackProbe`] each frame instead of measuring anything
//! itself.

use super::shape::Shape;

pub trait TrackProbe {
    /// True once the shape's horizontal extent lies fully outside the drop
    /// layer (inset by the edge padding)
    fn is_off_track(&self, shape: &Shape) -> bool;
}

/// Geometric probe for a drop layer of known width.
///
/// A shape's left edge sits at its anchor percentage of the layer width,
/// shifted by its slide offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerBounds {
    pub width: f32,
    pub padding: f32,
}

impl LayerBounds {
    pub fn new(width: f32, padding: f32) -> Self {
        Self { width, padding }
    }

    /// Left and right edge of a shape in layer coordinates
    pub fn extent(&self, shape: &Shape) -> (f32, f32) {
        let left = shape.anchor_percent / 100.0 * self.width + shape.base_offset;
        (left, left + shape.size.x)
    }
}

impl TrackProbe for LayerBounds {
    fn is_off_track(&self, shape: &Shape) -> bool {
        let (left, right) = self.extent(shape);
        right < self.padding || left > self.width - self.padding
    }
}

/// Probe that never reports a shape as off track
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverOffTrack;

impl TrackProbe for NeverOffTrack {
    fn is_off_track(&self, _shape: &Shape) -> bool {
        false
    }
}
