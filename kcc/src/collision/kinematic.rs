use super::{
    narrow_phase,
    registry::ColliderRegistry,
    settings::MIN_MOVE_SQ,
    shape::Shape,
    types::{Collision, Vec3},
};
use crate::actor::ActorSize;
use crate::math;
use crate::motion;
use crate::settings::ControllerSettings;

/// Walkable contact picked from one sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepGround {
    /// Normal with the smallest up component among the walkable contacts.
    pub normal: Vec3,
    /// Point of the deepest walkable contact.
    pub point: Vec3,
}

/// Result of resolving one tick's tentative displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepOutcome {
    /// Displacement to apply to the position.
    pub displacement: Vec3,
    /// Velocity with every opposing contact normal clipped out.
    pub velocity: Vec3,
    /// Set when at least one contact was walkable.
    pub ground: Option<SweepGround>,
    /// Number of contacts that were evaluated.
    pub contacts: usize,
}

/// Collide the actor's volume at `position + displacement` against every
/// registered collider.
///
/// - Boxes are tested through their transformed (world) bounds.
/// - Meshes are rejected by their transformed local bounds first and then
///   tested as the convex hull of their transformed vertices.
///
/// Returned directions point away from the colliders, i.e. along the way
/// the actor has to move to get out.
pub fn sweep<R: ColliderRegistry + ?Sized>(
    registry: &R,
    size: &ActorSize,
    position: &Vec3,
    displacement: &Vec3,
) -> Vec<Collision> {
    let target = position + displacement;
    let actor_bounds = size.bounds_at(&target);
    let actor = size.shape_at(&target);
    let mut hits = Vec::new();

    registry.for_each_box_collider(&mut |collider| {
        let bounds = math::world_bounds(&collider.bounds, collider.transform.as_ref());
        let c = narrow_phase::collide_bounded(&actor, &Shape::Box(bounds));
        if c.hit {
            hits.push(c);
        }
    });

    registry.for_each_mesh_collider(&mut |collider| {
        let bounds = math::world_bounds(&collider.local_bounds, collider.transform.as_ref());
        let candidate = match actor {
            Shape::Point(p) => math::contains(&bounds, &p),
            _ => math::intersects(&actor_bounds, &bounds),
        };
        if !candidate {
            return;
        }
        let vertices = collider.mesh.world_vertices(collider.transform.as_ref());
        let c = narrow_phase::collide(&actor, &Shape::VertexCloud(&vertices));
        if c.hit {
            hits.push(c);
        }
    });

    hits
}

/// Shorten `displacement` so it stops short of every contact, and clip
/// `velocity` against the contacts it drives into.
///
/// For each contact `approach = dot(move_dir, -direction)`. An approaching
/// contact removes `(depth + contact_margin) * approach` from the remaining
/// distance (never below zero). Walkable contacts are reported as ground.
pub fn resolve_sweep(
    displacement: &Vec3,
    velocity: &Vec3,
    collisions: &[Collision],
    settings: &ControllerSettings,
) -> SweepOutcome {
    let mut outcome = SweepOutcome {
        displacement: *displacement,
        velocity: *velocity,
        ground: None,
        contacts: collisions.len(),
    };

    let length_sq = displacement.norm_squared();
    if length_sq <= MIN_MOVE_SQ {
        outcome.displacement = Vec3::zeros();
        return outcome;
    }
    let length = length_sq.sqrt();
    let move_dir = displacement / length;

    let min_up = settings.min_walkable_up();
    let mut remaining = length;
    let mut lowest_up = f32::INFINITY;
    let mut deepest = f32::NEG_INFINITY;
    let mut ground = SweepGround {
        normal: Vec3::zeros(),
        point: Vec3::zeros(),
    };
    let mut grounded = false;

    for c in collisions.iter().filter(|c| c.hit) {
        let approach = move_dir.dot(&-c.direction);
        if approach > 0.0 {
            remaining = (remaining - (c.depth + settings.contact_margin) * approach).max(0.0);
            outcome.velocity = math::clip_vector(&outcome.velocity, &c.direction);
        }

        if motion::is_walkable(&c.direction, min_up) {
            grounded = true;
            // Normal and point are tracked separately and may come from
            // different contacts.
            if c.direction.z < lowest_up {
                lowest_up = c.direction.z;
                ground.normal = c.direction;
            }
            if c.depth > deepest {
                deepest = c.depth;
                ground.point = c.point;
            }
        }
    }

    outcome.displacement = move_dir * remaining;
    outcome.ground = grounded.then_some(ground);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{
        registry::StaticWorld,
        types::{BoundingBox, Point3, UP},
    };
    use crate::mesh::{Mesh, ModelTransform};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn tilted(deg_from_up: f32) -> Vec3 {
        let a = deg_from_up.to_radians();
        Vec3::new(-a.sin(), 0.0, a.cos())
    }

    #[test]
    fn steep_contact_is_hit_but_not_ground() {
        let settings = ControllerSettings::default();
        let steep = Collision::new(0.05, tilted(70.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(steep.hit);

        let out = resolve_sweep(&Vec3::new(0.1, 0.0, 0.0), &Vec3::new(6.0, 0.0, 0.0), &[steep], &settings);
        assert_eq!(out.contacts, 1);
        assert!(out.ground.is_none());
        // Still blocks the motion it opposes.
        assert!(out.displacement.x < 0.1);
    }

    #[test]
    fn gentle_contact_is_ground() {
        let settings = ControllerSettings::default();
        let gentle = Collision::new(0.01, tilted(30.0), Vec3::new(0.0, 0.0, 0.0));
        let out = resolve_sweep(&Vec3::new(0.0, 0.0, -0.1), &Vec3::new(0.0, 0.0, -6.0), &[gentle], &settings);
        let ground = out.ground.unwrap();
        assert_relative_eq!(ground.normal, tilted(30.0));
    }

    #[test]
    fn wall_contact_shortens_by_depth_and_margin() {
        let settings = ControllerSettings::default();
        let wall = Collision::new(0.05, -Vec3::x(), Vec3::new(0.3, 0.0, 0.5));
        let out = resolve_sweep(&Vec3::new(0.1, 0.0, 0.0), &Vec3::new(6.0, 0.0, 0.0), &[wall], &settings);
        assert_relative_eq!(out.displacement, Vec3::new(0.04, 0.0, 0.0), epsilon = 1.0e-6);
        assert_relative_eq!(out.velocity, Vec3::zeros(), epsilon = 1.0e-6);
        assert!(out.ground.is_none());
    }

    #[test]
    fn remaining_distance_never_goes_negative() {
        let settings = ControllerSettings::default();
        let wall = Collision::new(0.5, -Vec3::x(), Vec3::zeros());
        let out = resolve_sweep(&Vec3::new(0.1, 0.0, 0.0), &Vec3::new(6.0, 0.0, 0.0), &[wall], &settings);
        assert_eq!(out.displacement, Vec3::zeros());
    }

    #[test]
    fn receding_contact_leaves_motion_alone() {
        let settings = ControllerSettings::default();
        // Overlapping a wall at +x while moving away from it.
        let wall = Collision::new(0.05, -Vec3::x(), Vec3::zeros());
        let v = Vec3::new(-6.0, 0.0, 0.0);
        let out = resolve_sweep(&Vec3::new(-0.1, 0.0, 0.0), &v, &[wall], &settings);
        assert_relative_eq!(out.displacement, Vec3::new(-0.1, 0.0, 0.0));
        assert_eq!(out.velocity, v);
    }

    #[test]
    fn ground_normal_and_point_are_picked_independently() {
        let settings = ControllerSettings::default();
        let shallow_steeper = Collision::new(0.01, tilted(40.0), Vec3::new(1.0, 0.0, 0.0));
        let deep_flat = Collision::new(0.2, UP, Vec3::new(2.0, 0.0, 0.0));
        let out = resolve_sweep(
            &Vec3::new(0.0, 0.0, -0.3),
            &Vec3::new(0.0, 0.0, -18.0),
            &[deep_flat, shallow_steeper],
            &settings,
        );
        let ground = out.ground.unwrap();
        assert_relative_eq!(ground.normal, tilted(40.0));
        assert_eq!(ground.point, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn sweep_reports_box_and_mesh_contacts() {
        let mut world = StaticWorld::new();
        world.push_box(
            BoundingBox::new(Point3::new(-5.0, -5.0, -1.0), Point3::new(5.0, 5.0, 0.0)),
            None,
        );
        world.push_mesh(
            Arc::new(Mesh::solid_box(Vec3::new(0.5, 0.5, 0.5))),
            Some(ModelTransform::at(Vec3::new(1.0, 0.0, 0.5)).matrix()),
        );

        // Sinking 0.05 into the floor, nowhere near the mesh.
        let hits = sweep(&world, &ActorSize::SMALL, &Vec3::new(-2.0, 0.0, 0.0), &Vec3::new(0.0, 0.0, -0.05));
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].depth, 0.05, epsilon = 1.0e-4);
        assert_relative_eq!(hits[0].direction, UP, epsilon = 1.0e-4);

        // Hovering and stepping 0.1 into the mesh from the left.
        let hits = sweep(&world, &ActorSize::SMALL, &Vec3::new(0.2, 0.0, 0.02), &Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].depth, 0.05, epsilon = 1.0e-4);
        assert_relative_eq!(hits[0].direction, -Vec3::x(), epsilon = 1.0e-4);
    }

    #[test]
    fn point_actor_only_hits_what_contains_it() {
        let mut world = StaticWorld::new();
        world.push_box(
            BoundingBox::new(Point3::new(-5.0, -5.0, -1.0), Point3::new(5.0, 5.0, 0.0)),
            None,
        );
        assert!(sweep(&world, &ActorSize::Point, &Vec3::new(0.0, 0.0, 0.5), &Vec3::new(0.0, 0.0, -0.1)).is_empty());
        let hits = sweep(&world, &ActorSize::Point, &Vec3::new(0.0, 0.0, 0.05), &Vec3::new(0.0, 0.0, -0.1));
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].depth, 0.05, epsilon = 1.0e-4);
    }
}
