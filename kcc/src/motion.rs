//! Velocity model: gravity, friction and acceleration toward a wish direction.
//!
//! Everything here works on per-tick deltas already scaled by the tick
//! length, so `step_actor` decides the time step and these helpers stay pure.

use crate::collision::{
    settings::DIST_EPS,
    types::{Vec2, Vec3},
};
use crate::math;

/// Add one tick of gravity to `velocity.z`, clamped to the terminal fall speed.
#[inline]
pub fn apply_gravity(velocity: Vec3, gravity_delta: f32, terminal_fall_speed: f32) -> Vec3 {
    let mut v = velocity;
    v.z = (v.z - gravity_delta).max(-terminal_fall_speed);
    v
}

/// Reduce horizontal speed by `drop`, never reversing direction.
///
/// Speeds that end up below `stop_speed` become exactly zero.
pub fn apply_friction(velocity: Vec3, drop: f32, stop_speed: f32) -> Vec3 {
    let speed = velocity.xy().norm();
    if speed <= DIST_EPS {
        return Vec3::new(0.0, 0.0, velocity.z);
    }

    let new_speed = (speed - drop).max(0.0);
    if new_speed < stop_speed {
        return Vec3::new(0.0, 0.0, velocity.z);
    }

    let scale = new_speed / speed;
    Vec3::new(velocity.x * scale, velocity.y * scale, velocity.z)
}

/// Accelerate toward `wish_dir` (unit) without exceeding `max_speed` along it.
///
/// `addSpeed = max_speed - dot(velocity, wish_dir)`; no-op when already at or
/// above the cap in that direction.
pub fn accelerate(velocity: Vec3, wish_dir: &Vec3, max_speed: f32, accel_delta: f32) -> Vec3 {
    let current = velocity.dot(wish_dir);
    let add_speed = max_speed - current;
    if add_speed <= 0.0 {
        return velocity;
    }
    let accel = accel_delta.min(add_speed);
    velocity + wish_dir * accel
}

/// Unit movement direction for a planar input.
///
/// On the ground the input is tilted into the ground plane so walking up or
/// down a slope follows it; in the air it stays horizontal. `None` for no input.
pub fn wish_direction(input: &Vec2, ground_normal: Option<&Vec3>) -> Option<Vec3> {
    let planar = input.try_normalize(DIST_EPS)?;
    let dir = match ground_normal {
        Some(n) => math::vector2_in_plane(&planar, n),
        None => Vec3::new(planar.x, planar.y, 0.0),
    };
    dir.try_normalize(DIST_EPS)
}

/// True if a surface with this normal is gentle enough to stand on.
#[inline]
pub fn is_walkable(normal: &Vec3, min_walkable_up: f32) -> bool {
    normal.z >= min_walkable_up
}
