use super::types::{BoundingBox, Vec3};
use crate::math;

/// Convex query shape consumed by the narrow phase.
///
/// The narrow phase only ever asks a shape for its support point, so every
/// variant is described in world space and borrowed for the duration of a
/// query. A vertex cloud stands for the convex hull of its points.
#[derive(Clone, Copy, Debug)]
pub enum Shape<'a> {
    Point(Vec3),
    Box(BoundingBox),
    VertexCloud(&'a [Vec3]),
}

impl Shape<'_> {
    /// Furthest point of the shape along `dir`.
    ///
    /// Box ties (a zero direction component) resolve to the max corner.
    pub fn support(&self, dir: &Vec3) -> Vec3 {
        match self {
            Shape::Point(p) => *p,
            Shape::Box(b) => Vec3::new(
                if dir.x >= 0.0 { b.maxs.x } else { b.mins.x },
                if dir.y >= 0.0 { b.maxs.y } else { b.mins.y },
                if dir.z >= 0.0 { b.maxs.z } else { b.mins.z },
            ),
            Shape::VertexCloud(points) => {
                let mut best = Vec3::zeros();
                let mut best_dot = f32::NEG_INFINITY;
                for p in points.iter() {
                    let d = p.dot(dir);
                    if d > best_dot {
                        best_dot = d;
                        best = *p;
                    }
                }
                best
            }
        }
    }

    /// Interior reference point, used to seed the GJK search direction.
    pub fn center(&self) -> Vec3 {
        match self {
            Shape::Point(p) => *p,
            Shape::Box(b) => math::center(b),
            Shape::VertexCloud(points) => {
                if points.is_empty() {
                    return Vec3::zeros();
                }
                points.iter().sum::<Vec3>() / points.len() as f32
            }
        }
    }

    /// World-space envelope. `None` for an empty vertex cloud.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Shape::Point(p) => Some(math::point_bounds(p)),
            Shape::Box(b) => Some(*b),
            Shape::VertexCloud(points) => math::bounds_of_points(points),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Shape::VertexCloud(points) if points.is_empty())
    }
}
