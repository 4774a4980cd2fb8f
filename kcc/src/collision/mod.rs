/*!
Collision root module.

This module re-exports the pieces the actor controller is built from. Every
query reads the static colliders through the `ColliderRegistry` trait, so
callers decide how level geometry is stored. The code is split for clarity:

- types:        shared data types (Collision, RayCollision, math aliases)
- settings:     fixed tolerances and iteration limits
- shape:        support-mapped query shapes (point, box, vertex cloud)
- narrow_phase: GJK/EPA penetration queries
- ray:          ray casts against boxes and meshes, elevation lookups
- registry:     collider registry trait and a Vec-backed static world
- ground:       downward probe and hover snap
- kinematic:    volume sweep and displacement resolution
*/

pub mod ground;
pub mod kinematic;
pub mod narrow_phase;
pub mod ray;
pub mod registry;
pub mod settings;
pub mod shape;
pub mod types;

// Re-export commonly used types and functions.
pub use ground::{GroundProbe, probe_ground};
pub use kinematic::{SweepGround, SweepOutcome, resolve_sweep, sweep};
pub use narrow_phase::{collide, collide_bounded};
pub use ray::{cast_ray, get_elevation};
pub use registry::{
    BoxCollider, ColliderRegistry, ColliderShapeDef, MeshCollider, StaticColliderDef, StaticWorld,
};
pub use shape::Shape;
pub use types::{BoundingBox, Collision, DOWN, Mat4, Point3, RayCollision, UP, Vec2, Vec3};
