use super::{
    ray,
    registry::ColliderRegistry,
    settings::{PROBE_CORNER_INSET, PROBE_LIFT},
    types::{DOWN, RayCollision, UP, Vec3},
};
use crate::actor::ActorSize;

/// Nearest surface found under an actor's feet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundProbe {
    /// Vertical distance from the feet to the surface; negative when sunk into it.
    pub gap: f32,
    pub normal: Vec3,
    pub point: Vec3,
}

/// Cast straight down from the feet and report the nearest surface within
/// `max_gap`.
///
/// - Rays start `PROBE_LIFT` above the feet so an actor that sank slightly
///   still sees the surface it stands in.
/// - A point actor casts one ray. A box actor also casts from its four
///   bottom corners (inset slightly) so it keeps standing on ledges.
pub fn probe_ground<R: ColliderRegistry + ?Sized>(
    registry: &R,
    size: &ActorSize,
    position: &Vec3,
    max_gap: f32,
) -> Option<GroundProbe> {
    if max_gap < 0.0 {
        return None;
    }

    let reach = PROBE_LIFT + max_gap;
    let cast = |offset_x: f32, offset_y: f32| -> RayCollision {
        let origin = Vec3::new(
            position.x + offset_x,
            position.y + offset_y,
            position.z + PROBE_LIFT,
        );
        ray::cast_ray(registry, &origin, &DOWN, reach)
    };

    let mut best = cast(0.0, 0.0);
    if let ActorSize::Box(spec) = size {
        let r = (spec.radius - PROBE_CORNER_INSET).max(0.0);
        for (dx, dy) in [(r, r), (r, -r), (-r, r), (-r, -r)] {
            let hit = cast(dx, dy);
            if hit.is_closer_than(&best) {
                best = hit;
            }
        }
    }

    best.hit.then(|| GroundProbe {
        gap: best.distance - PROBE_LIFT,
        normal: best.normal,
        point: best.point,
    })
}

/// Vertical correction that puts the feet exactly `hover` above the probed
/// surface, or `None` when the gap is already within `tolerance` of it.
#[inline]
pub fn snap_offset(probe: &GroundProbe, hover: f32, tolerance: f32) -> Option<Vec3> {
    let error = probe.gap - hover;
    (error.abs() > tolerance).then(|| -UP * error)
}
