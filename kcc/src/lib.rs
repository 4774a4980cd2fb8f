pub mod actor;
pub mod collision;
pub mod math;
pub mod mesh;
pub mod motion;
pub mod movement;
pub mod settings;

pub use actor::{Actor, ActorSize, BoxSpec};
pub use collision::{
    BoundingBox, BoxCollider, ColliderRegistry, ColliderShapeDef, Collision, MeshCollider,
    RayCollision, Shape, StaticColliderDef, StaticWorld, Vec2, Vec3, collide, get_elevation,
};
pub use mesh::{Mesh, ModelTransform};
pub use movement::{ActorInput, StepReport, probe, step_actor};
pub use settings::{ControllerSettings, SettingsError};
