use crate::collision::{
    shape::Shape,
    types::{BoundingBox, Point3, UP, Vec3},
};
use crate::settings::{ACTOR_SMALL_HALF_HEIGHT, ACTOR_SMALL_RADIUS};

/// Box dimensions of a sized actor.
///
/// The box spans `radius` on both horizontal axes and `2 * half_height`
/// vertically, standing on the actor's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSpec {
    pub radius: f32,
    pub half_height: f32,
}

/// Collision geometry class of an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActorSize {
    /// Zero-size actor; collides as a single point.
    Point,
    Box(BoxSpec),
}

impl ActorSize {
    pub const SMALL: Self = Self::Box(BoxSpec {
        radius: ACTOR_SMALL_RADIUS,
        half_height: ACTOR_SMALL_HALF_HEIGHT,
    });

    /// Half extents `(r, r, half_height)`; zero for a point.
    ///
    /// `StaticWorld::expanded` inflates level geometry by this much, so a ray
    /// from `center_at` through the inflated world behaves like this size
    /// against the original.
    pub fn extents(&self) -> Vec3 {
        match self {
            ActorSize::Point => Vec3::zeros(),
            ActorSize::Box(spec) => Vec3::new(spec.radius, spec.radius, spec.half_height),
        }
    }

    /// Center of the volume with the feet at `position`.
    #[inline]
    pub fn center_at(&self, position: &Vec3) -> Vec3 {
        position + Vec3::new(0.0, 0.0, self.extents().z)
    }

    /// World-space volume with the feet at `position`.
    pub fn bounds_at(&self, position: &Vec3) -> BoundingBox {
        match self {
            ActorSize::Point => BoundingBox::new(Point3::from(*position), Point3::from(*position)),
            ActorSize::Box(spec) => BoundingBox::new(
                Point3::new(position.x - spec.radius, position.y - spec.radius, position.z),
                Point3::new(
                    position.x + spec.radius,
                    position.y + spec.radius,
                    position.z + 2.0 * spec.half_height,
                ),
            ),
        }
    }

    /// Narrow-phase shape with the feet at `position`.
    pub fn shape_at(&self, position: &Vec3) -> Shape<'static> {
        match self {
            ActorSize::Point => Shape::Point(*position),
            ActorSize::Box(_) => Shape::Box(self.bounds_at(position)),
        }
    }
}

/// Physical state of a moving agent.
///
/// Position is kept by the caller; the controller borrows both for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Actor {
    /// Meters per second.
    pub velocity: Vec3,
    pub size: ActorSize,
    /// Ticks left in the ground grace window; `0` means airborne.
    pub grounded: u32,
    /// Last known walkable ground normal.
    pub ground_normal: Vec3,
}

impl Actor {
    pub fn new(size: ActorSize) -> Self {
        Self {
            velocity: Vec3::zeros(),
            size,
            grounded: 0,
            ground_normal: UP,
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded > 0
    }

    /// Debug-only invariant check: NaN in the state would poison every later tick.
    #[inline]
    pub fn debug_validate(&self, position: &Vec3) {
        debug_assert!(
            !self.velocity.iter().any(|c| c.is_nan()),
            "actor velocity is NaN: {:?}",
            self.velocity
        );
        debug_assert!(
            !position.iter().any(|c| c.is_nan()),
            "actor position is NaN: {position:?}"
        );
    }
}
