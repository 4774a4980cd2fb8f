//! Vector and bounding-box helpers.
//!
//! Everything here is a pure function over nalgebra vectors and parry
//! `Aabb`s; box tests defer to parry. Intervals are closed: touching boxes
//! intersect.

use nalgebra as na;
use rapier3d::parry::bounding_volume::BoundingVolume;

use crate::collision::types::{BoundingBox, Mat4, Point3, Vec2, Vec3};
use crate::collision::settings::DIST_EPS;

/// True iff the two boxes overlap on all three axes.
#[inline]
pub fn intersects(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.intersects(b)
}

/// True iff `p` lies inside `b` (bounds included).
#[inline]
pub fn contains(b: &BoundingBox, p: &Vec3) -> bool {
    b.contains_local_point(&Point3::from(*p))
}

/// Zero-size box at `p`.
#[inline]
pub fn point_bounds(p: &Vec3) -> BoundingBox {
    BoundingBox::new(Point3::from(*p), Point3::from(*p))
}

/// Shift both corners by `delta`.
#[inline]
pub fn translate(b: &BoundingBox, delta: &Vec3) -> BoundingBox {
    BoundingBox::new(b.mins + *delta, b.maxs + *delta)
}

/// Box center.
#[inline]
pub fn center(b: &BoundingBox) -> Vec3 {
    na::center(&b.mins, &b.maxs).coords
}

/// Transform the eight corners of `b` by `m` and return their envelope.
///
/// Conservative: a rotated box produces a larger axis-aligned box, never a
/// tight oriented one.
pub fn transform_bounding_box(b: &BoundingBox, m: &Mat4) -> BoundingBox {
    let mut mins = Point3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut maxs = Point3::new(f32::MIN, f32::MIN, f32::MIN);
    for i in 0..8 {
        let corner = Point3::new(
            if i & 1 == 0 { b.mins.x } else { b.maxs.x },
            if i & 2 == 0 { b.mins.y } else { b.maxs.y },
            if i & 4 == 0 { b.mins.z } else { b.maxs.z },
        );
        let t = m.transform_point(&corner);
        mins = mins.inf(&t);
        maxs = maxs.sup(&t);
    }
    BoundingBox::new(mins, maxs)
}

/// Apply an optional reference frame to a box (absent means identity).
#[inline]
pub fn world_bounds(b: &BoundingBox, transform: Option<&Mat4>) -> BoundingBox {
    match transform {
        Some(m) => transform_bounding_box(b, m),
        None => *b,
    }
}

/// Envelope of a point set. `None` for an empty slice.
pub fn bounds_of_points(points: &[Vec3]) -> Option<BoundingBox> {
    if points.is_empty() {
        return None;
    }
    let mut bounds = BoundingBox::new_invalid();
    for p in points {
        bounds.take_point(Point3::from(*p));
    }
    Some(bounds)
}

/// Remove the component of `v` along the unit `normal`.
#[inline]
pub fn clip_vector(v: &Vec3, normal: &Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Transform every point by `m`.
pub fn transform_points(points: &[Vec3], m: &Mat4) -> Vec<Vec3> {
    points
        .iter()
        .map(|p| m.transform_point(&Point3::from(*p)).coords)
        .collect()
}

/// Tilt a planar move into the plane with normal `normal`, keeping its planar length.
///
/// A near-vertical plane (`normal.z ~ 0`) cannot be walked along, so the move
/// stays flat.
pub fn vector2_in_plane(v: &Vec2, normal: &Vec3) -> Vec3 {
    let planar_len = v.norm();
    if planar_len <= DIST_EPS || normal.z.abs() <= DIST_EPS {
        return Vec3::new(v.x, v.y, 0.0);
    }
    let z = -(normal.x * v.x + normal.y * v.y) / normal.z;
    let tilted = Vec3::new(v.x, v.y, z);
    tilted * (planar_len / tilted.norm())
}
