/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between
the narrow phase, ray casting, the collider registry and the controller.

Conventions
- World space is Z-up.
- `Collision::direction` is the unit vector along which shape A has to move
  by `depth` to stop overlapping shape B, i.e. it points from B toward A.
- A missed ray reports `hit = false` and an infinite distance.
*/

use nalgebra as na;
use rapier3d::parry::bounding_volume::Aabb;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Vec2 = na::Vector2<f32>;
pub type Point3 = na::Point3<f32>;
pub type Mat4 = na::Matrix4<f32>;

/// Axis-aligned box with `mins <= maxs` on every axis.
pub type BoundingBox = Aabb;

/// World up axis.
pub const UP: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// World down axis.
pub const DOWN: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Result of a narrow-phase penetration query between two shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub hit: bool,
    /// Minimum translation distance separating the shapes along `direction`.
    pub depth: f32,
    /// Unit separating direction for shape A.
    pub direction: Vec3,
    /// Representative contact point (world space).
    pub point: Vec3,
}

impl Collision {
    /// The "no overlap" result. Depth, direction and point are meaningless.
    pub const NONE: Self = Self {
        hit: false,
        depth: 0.0,
        direction: Vec3::new(0.0, 0.0, 0.0),
        point: Vec3::new(0.0, 0.0, 0.0),
    };

    #[inline]
    pub fn new(depth: f32, direction: Vec3, point: Vec3) -> Self {
        Self {
            hit: true,
            depth,
            direction,
            point,
        }
    }
}

/// Result of a ray query against world colliders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCollision {
    pub hit: bool,
    /// Distance along the (normalized) ray direction. Infinite on a miss.
    pub distance: f32,
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl RayCollision {
    pub const MISS: Self = Self {
        hit: false,
        distance: f32::INFINITY,
        point: Vec3::new(0.0, 0.0, 0.0),
        normal: Vec3::new(0.0, 0.0, 0.0),
    };

    #[inline]
    pub fn new(distance: f32, point: Vec3, normal: Vec3) -> Self {
        Self {
            hit: true,
            distance,
            point,
            normal,
        }
    }

    /// True if `self` is a hit closer than `other` (a miss never is).
    #[inline]
    pub fn is_closer_than(&self, other: &RayCollision) -> bool {
        self.hit && (!other.hit || self.distance < other.distance)
    }
}

impl Default for RayCollision {
    fn default() -> Self {
        Self::MISS
    }
}
