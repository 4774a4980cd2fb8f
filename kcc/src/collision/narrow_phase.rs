/*!
Narrow-phase penetration queries.

Thin wrappers over parry's support-map algorithms: `Shape` implements
`SupportMap`, GJK decides overlap and EPA recovers the penetration depth,
the separating direction and the witness points. Every shape is already in
world space, so the relative pose passed to parry is the identity.

Notes
- GJK and EPA are bounded inside parry. EPA failing to converge is reported
  as no collision, never as an error.
- A Minkowski difference without thickness along the reported normal (e.g. a
  point against a flat vertex cloud) reports no penetration.
- Callers should reject by bounding boxes first; `collide_bounded` does both.
*/

use rapier3d::parry::{
    math::{Isometry, Point, Real, Vector},
    query::{
        epa::EPA,
        gjk::{self, CSOPoint, GJKResult, VoronoiSimplex},
    },
    shape::SupportMap,
};

use super::{
    settings::DIST_EPS,
    shape::Shape,
    types::{Collision, Vec3},
};
use crate::math;

impl SupportMap for Shape<'_> {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        Point::from(self.support(dir))
    }
}

/// Overlap test plus penetration resolution for two shapes.
///
/// `direction` is the unit vector along which `a` must move by `depth` to
/// separate from `b`. Swapping the arguments negates it.
pub fn collide(a: &Shape, b: &Shape) -> Collision {
    if a.is_empty() || b.is_empty() {
        return Collision::NONE;
    }

    // Two points have no volume to penetrate; they either coincide or not.
    if let (Shape::Point(pa), Shape::Point(pb)) = (a, b) {
        if (pa - pb).norm_squared() <= DIST_EPS * DIST_EPS {
            return Collision::new(0.0, Vec3::zeros(), *pa);
        }
        return Collision::NONE;
    }

    let pos12 = Isometry::identity();
    let mut dir = a.center() - b.center();
    if dir.norm_squared() <= DIST_EPS * DIST_EPS {
        dir = Vec3::x();
    }

    let mut simplex = VoronoiSimplex::new();
    simplex.reset(CSOPoint::from_shapes(&pos12, a, b, &dir));
    let overlap = gjk::closest_points(&pos12, a, b, 0.0, false, &mut simplex);
    if !matches!(overlap, GJKResult::Intersection) {
        return Collision::NONE;
    }

    let Some((on_a, on_b, normal)) = EPA::new().closest_points(&pos12, a, b, &simplex) else {
        log::debug!("EPA did not converge; treating as no hit");
        return Collision::NONE;
    };

    // `normal` points from A into B; A leaves along its opposite.
    let normal = normal.into_inner();
    if thickness_along(a, b, &normal) <= DIST_EPS {
        return Collision::NONE;
    }

    let depth = (on_a - on_b).dot(&normal).max(0.0);
    Collision::new(depth, -normal, midpoint(&on_a, &on_b))
}

/// Extent of the Minkowski difference `A - B` along `n`.
fn thickness_along(a: &Shape, b: &Shape, n: &Vec3) -> f32 {
    let far = a.support(n) - b.support(&-n);
    let near = a.support(&-n) - b.support(n);
    (far - near).dot(n)
}

#[inline]
fn midpoint(p: &Point<Real>, q: &Point<Real>) -> Vec3 {
    (p.coords + q.coords) * 0.5
}

/// `collide` behind the cheap bounding-box rejection.
///
/// A point side uses containment, everything else box overlap.
pub fn collide_bounded(a: &Shape, b: &Shape) -> Collision {
    let (Some(box_a), Some(box_b)) = (a.bounding_box(), b.bounding_box()) else {
        return Collision::NONE;
    };

    let candidate = match (a, b) {
        (Shape::Point(p), _) => math::contains(&box_b, p),
        (_, Shape::Point(p)) => math::contains(&box_a, p),
        _ => math::intersects(&box_a, &box_b),
    };

    if candidate {
        collide(a, b)
    } else {
        Collision::NONE
    }
}
