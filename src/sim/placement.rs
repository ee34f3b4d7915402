//! Slide resolver
//!
//! Whenever the beam angle may have changed, every resting shape slides
//! further along the beam: fully downhill on the lowered side, a damped
//! amount inward on the raised side. Offsets accumulate across calls, so the
//! same angle sequence must be replayed in order to reproduce positions.

use super::shape::{Shape, Side};
use crate::anim::{Ease, Prop, Target, Tween, TweenFacility};
use crate::consts::*;

/// Slide multiplier for a shape on `side` under `angle` (degrees)
pub fn slide_direction(side: Side, angle: f32) -> f32 {
    if angle > 0.0 {
        match side {
            Side::Right => 1.0,
            Side::Left => -CROSS_SLIDE,
        }
    } else if angle < 0.0 {
        match side {
            Side::Left => -1.0,
            Side::Right => CROSS_SLIDE,
        }
    } else {
        0.0
    }
}

/// Offset bound for a shape
#[inline]
pub fn slide_limit(fixed: bool) -> f32 {
    if fixed { FIXED_SLIDE_LIMIT } else { FREE_SLIDE_LIMIT }
}

/// Rotate the beam to `angle` and slide every resting shape in `shapes`
pub fn recompute(angle: f32, shapes: &mut [Shape], fx: &mut dyn TweenFacility) {
    fx.animate(
        Tween::new(Target::Beam, BEAM_DURATION, Ease::BEAM)
            .to(Prop::Rotation, angle)
            .overwrite(),
    );

    for shape in shapes.iter_mut().filter(|s| s.is_resting()) {
        let slide = angle.abs() * SLIDE_PER_DEGREE * slide_direction(shape.side, angle);
        let limit = slide_limit(shape.fixed);
        shape.base_offset = (shape.base_offset + slide).clamp(-limit, limit);

        fx.animate(
            Tween::new(Target::Shape(shape.id), SLIDE_DURATION, Ease::Power2Out)
                .to(Prop::X, shape.base_offset)
                .overwrite(),
        );
    }

    log::trace!("recompute: angle {:.2}, {} shapes", angle, shapes.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::Timeline;
    use crate::sim::Lifecycle;
    use crate::sim::shape::test_support::landed;
    use proptest::prelude::*;

    #[test]
    fn test_direction_table() {
        assert_eq!(slide_direction(Side::Right, 4.2), 1.0);
        assert_eq!(slide_direction(Side::Left, 4.2), -0.35);
        assert_eq!(slide_direction(Side::Left, -4.2), -1.0);
        assert_eq!(slide_direction(Side::Right, -4.2), 0.35);
        assert_eq!(slide_direction(Side::Left, 0.0), 0.0);
    }

    #[test]
    fn test_single_right_shape_slides_right() {
        let mut tl = Timeline::new();
        let mut shapes = vec![landed(1, Side::Right, 1.0, false)];
        recompute(4.2, &mut shapes, &mut tl);
        assert!((shapes[0].base_offset - 4.2 * 0.52).abs() < 1e-5);

        tl.advance(2.0);
        assert!((tl.value(Target::Shape(shapes[0].id), Prop::X) - 4.2 * 0.52).abs() < 1e-4);
        assert!((tl.value(Target::Beam, Prop::Rotation) - 4.2).abs() < 1e-4);
    }

    #[test]
    fn test_cross_side_is_damped() {
        let mut tl = Timeline::new();
        let mut shapes = vec![landed(1, Side::Left, 1.0, false)];
        recompute(10.0, &mut shapes, &mut tl);
        assert!((shapes[0].base_offset + 10.0 * 0.52 * 0.35).abs() < 1e-5);
    }

    #[test]
    fn test_offsets_accumulate_and_clamp() {
        let mut tl = Timeline::new();
        let mut shapes = vec![
            landed(1, Side::Right, 1.0, true),
            landed(2, Side::Right, 1.0, false),
        ];
        for _ in 0..100 {
            recompute(14.7, &mut shapes, &mut tl);
        }
        assert_eq!(shapes[0].base_offset, FIXED_SLIDE_LIMIT);
        assert_eq!(shapes[1].base_offset, FREE_SLIDE_LIMIT);
    }

    #[test]
    fn test_falling_shapes_are_skipped() {
        let mut tl = Timeline::new();
        let mut shapes = vec![landed(1, Side::Right, 1.0, false)];
        shapes[0].state = Lifecycle::Falling;
        recompute(14.7, &mut shapes, &mut tl);
        assert_eq!(shapes[0].base_offset, 0.0);
        assert!(!tl.is_animating(Target::Shape(shapes[0].id), Prop::X));
    }

    proptest! {
        #[test]
        fn offsets_stay_within_limits(
            angles in prop::collection::vec(-14.7f32..14.7, 1..80),
            sides in prop::collection::vec(any::<bool>(), 1..12),
        ) {
            let mut tl = Timeline::new();
            let mut shapes: Vec<Shape> = sides
                .iter()
                .enumerate()
                .map(|(i, &right)| {
                    let side = if right { Side::Right } else { Side::Left };
                    landed(i as u32, side, 1.0, i % 3 == 0)
                })
                .collect();
            for angle in angles {
                recompute(angle, &mut shapes, &mut tl);
                for s in &shapes {
                    prop_assert!(s.base_offset.abs() <= slide_limit(s.fixed));
                }
            }
        }
    }
}
