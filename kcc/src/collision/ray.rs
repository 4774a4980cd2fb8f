use rapier3d::parry::{
    query::{Ray, RayCast},
    shape::Triangle,
};

use super::{
    registry::ColliderRegistry,
    settings::DIST_EPS,
    types::{BoundingBox, DOWN, Mat4, Point3, RayCollision, Vec3},
};
use crate::math;
use crate::mesh::Mesh;

/// Exact ray/box test. An origin inside the box hits at distance 0.
///
/// `dir` must be unit length; hits at `max_distance` or beyond are misses.
pub fn ray_box(origin: &Vec3, dir: &Vec3, bounds: &BoundingBox, max_distance: f32) -> RayCollision {
    let ray = Ray::new(Point3::from(*origin), *dir);
    match bounds.cast_local_ray_and_get_normal(&ray, max_distance, true) {
        Some(hit) if hit.time_of_impact < max_distance => {
            RayCollision::new(hit.time_of_impact, origin + dir * hit.time_of_impact, hit.normal)
        }
        _ => RayCollision::MISS,
    }
}

/// Closest front-facing triangle hit.
///
/// A facet only counts when its winding normal is at least 90 degrees away
/// from the ray direction, so rays leaving thin geometry from the inside do
/// not stop on its back faces.
pub fn ray_mesh(
    origin: &Vec3,
    dir: &Vec3,
    mesh: &Mesh,
    transform: Option<&Mat4>,
    max_distance: f32,
) -> RayCollision {
    let ray = Ray::new(Point3::from(*origin), *dir);
    let mut best = RayCollision::MISS;
    let mut limit = max_distance;

    for i in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(i).map(|v| match transform {
            Some(m) => m.transform_point(&Point3::from(v)),
            None => Point3::from(v),
        });

        let Some(normal) = (b - a).cross(&(c - a)).try_normalize(DIST_EPS * DIST_EPS) else {
            continue;
        };
        if normal.dot(dir) > 0.0 {
            continue;
        }

        if let Some(toi) = Triangle::new(a, b, c).cast_local_ray(&ray, limit, true) {
            if toi < limit {
                limit = toi;
                best = RayCollision::new(toi, origin + dir * toi, normal);
            }
        }
    }

    best
}

/// Closest hit among every registered collider within `max_distance`.
///
/// Box colliders are tested against their transformed (conservative) bounds;
/// mesh colliders are pre-filtered by a ray test against their transformed
/// local bounds. A zero `direction` never hits.
pub fn cast_ray<R: ColliderRegistry + ?Sized>(
    registry: &R,
    origin: &Vec3,
    direction: &Vec3,
    max_distance: f32,
) -> RayCollision {
    let Some(dir) = direction.try_normalize(DIST_EPS) else {
        return RayCollision::MISS;
    };

    let mut best = RayCollision::MISS;

    registry.for_each_box_collider(&mut |collider| {
        let limit = best.distance.min(max_distance);
        let bounds = math::world_bounds(&collider.bounds, collider.transform.as_ref());
        let hit = ray_box(origin, &dir, &bounds, limit);
        if hit.is_closer_than(&best) {
            best = hit;
        }
    });

    registry.for_each_mesh_collider(&mut |collider| {
        let limit = best.distance.min(max_distance);
        let bounds = math::world_bounds(&collider.local_bounds, collider.transform.as_ref());
        if !ray_box(origin, &dir, &bounds, limit).hit {
            return;
        }
        let hit = ray_mesh(origin, &dir, &collider.mesh, collider.transform.as_ref(), limit);
        if hit.is_closer_than(&best) {
            best = hit;
        }
    });

    best
}

/// Height of the first surface straight below `(x, y, z_start)`, if any.
pub fn get_elevation<R: ColliderRegistry + ?Sized>(
    registry: &R,
    x: f32,
    y: f32,
    z_start: f32,
) -> Option<f32> {
    let hit = cast_ray(registry, &Vec3::new(x, y, z_start), &DOWN, f32::INFINITY);
    hit.hit.then_some(hit.point.z)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collision::registry::StaticWorld;
    use crate::collision::types::UP;
    use crate::mesh::ModelTransform;
    use approx::assert_relative_eq;

    fn ground_box() -> BoundingBox {
        BoundingBox::new(Point3::new(-50.0, -50.0, -1.0), Point3::new(50.0, 50.0, 0.0))
    }

    #[test]
    fn ray_aimed_away_misses_everything() {
        let mut world = StaticWorld::new();
        world.push_box(ground_box(), None);
        world.push_mesh(Arc::new(Mesh::grid_plane(4.0, 4.0, 2, 2, |_, _| 1.0)), None);

        let hit = cast_ray(&world, &Vec3::new(0.0, 0.0, 5.0), &UP, 100.0);
        assert!(!hit.hit);
        assert_eq!(hit.distance, f32::INFINITY);
    }

    #[test]
    fn closest_of_box_and_mesh_wins() {
        let mut world = StaticWorld::new();
        world.push_box(ground_box(), None);
        world.push_mesh(Arc::new(Mesh::grid_plane(4.0, 4.0, 2, 2, |_, _| 1.0)), None);

        let down = cast_ray(&world, &Vec3::new(0.5, 0.5, 5.0), &DOWN, 100.0);
        assert!(down.hit);
        assert_relative_eq!(down.distance, 4.0, epsilon = 1.0e-5);
        assert_relative_eq!(down.normal, UP, epsilon = 1.0e-6);

        // Outside the plane the box is the only thing below.
        let beside = cast_ray(&world, &Vec3::new(10.0, 0.0, 5.0), &DOWN, 100.0);
        assert_relative_eq!(beside.distance, 5.0, epsilon = 1.0e-5);
    }

    #[test]
    fn hits_beyond_max_distance_are_ignored() {
        let mut world = StaticWorld::new();
        world.push_box(ground_box(), None);
        assert!(!cast_ray(&world, &Vec3::new(0.0, 0.0, 5.0), &DOWN, 5.0).hit);
        assert!(cast_ray(&world, &Vec3::new(0.0, 0.0, 5.0), &DOWN, 5.01).hit);
    }

    #[test]
    fn back_faces_are_rejected() {
        let mut world = StaticWorld::new();
        world.push_mesh(Arc::new(Mesh::grid_plane(4.0, 4.0, 1, 1, |_, _| 0.0)), None);

        // From below, the up-facing plane shows its back.
        assert!(!cast_ray(&world, &Vec3::new(0.2, 0.3, -1.0), &UP, 10.0).hit);
        assert!(cast_ray(&world, &Vec3::new(0.2, 0.3, 1.0), &DOWN, 10.0).hit);
    }

    #[test]
    fn rays_inside_a_room_hit_the_inner_walls() {
        let room = Arc::new(Mesh::inverted_box(Vec3::new(5.0, 5.0, 3.0)));
        let mut world = StaticWorld::new();
        world.push_mesh(room, Some(ModelTransform::at(Vec3::new(0.0, 0.0, 3.0)).matrix()));

        let floor = cast_ray(&world, &Vec3::new(1.0, 1.0, 2.0), &DOWN, 100.0);
        assert!(floor.hit);
        assert_relative_eq!(floor.distance, 2.0, epsilon = 1.0e-5);
        assert_relative_eq!(floor.normal, UP, epsilon = 1.0e-6);

        let wall = cast_ray(&world, &Vec3::new(1.0, 1.0, 2.0), &Vec3::x(), 100.0);
        assert_relative_eq!(wall.distance, 4.0, epsilon = 1.0e-5);
        assert_relative_eq!(wall.normal, -Vec3::x(), epsilon = 1.0e-6);
    }

    #[test]
    fn transformed_box_is_found_where_it_was_placed() {
        let mut world = StaticWorld::new();
        let unit = BoundingBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        world.push_box(unit, Some(ModelTransform::at(Vec3::new(0.0, 0.0, -4.0)).matrix()));
        let z = get_elevation(&world, 0.0, 0.0, 10.0).unwrap();
        assert_relative_eq!(z, -3.0, epsilon = 1.0e-5);
        assert_eq!(get_elevation(&world, 3.0, 0.0, 10.0), None);
    }

    #[test]
    fn elevation_reads_mesh_heights() {
        let mut world = StaticWorld::new();
        world.push_mesh(
            Arc::new(Mesh::grid_plane(10.0, 10.0, 10, 10, |_, _| 2.5)),
            None,
        );
        let z = get_elevation(&world, 1.3, -2.1, 50.0).unwrap();
        assert_relative_eq!(z, 2.5, epsilon = 1.0e-4);
    }
}
