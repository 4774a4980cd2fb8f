use std::sync::Arc;

use super::types::{BoundingBox, Mat4};
use crate::actor::ActorSize;
use crate::math;
use crate::mesh::{Mesh, ModelTransform};

/// Static box collider: an axis-aligned box in its own frame.
#[derive(Clone, Debug)]
pub struct BoxCollider {
    pub bounds: BoundingBox,
    /// Reference frame; `None` is identity.
    pub transform: Option<Mat4>,
}

/// Static mesh collider.
///
/// In the sweep the mesh acts as the convex hull of its vertices, so concave
/// level geometry should be split into convex pieces. Ray casts use the
/// actual triangles.
#[derive(Clone, Debug)]
pub struct MeshCollider {
    pub mesh: Arc<Mesh>,
    /// Envelope of `mesh` in its own frame, used for cheap rejection.
    pub local_bounds: BoundingBox,
    /// Reference frame; `None` is identity.
    pub transform: Option<Mat4>,
}

impl BoxCollider {
    pub fn new(bounds: BoundingBox, transform: Option<Mat4>) -> Self {
        Self { bounds, transform }
    }
}

impl MeshCollider {
    pub fn new(mesh: Arc<Mesh>, transform: Option<Mat4>) -> Self {
        let local_bounds = mesh.bounding_box();
        Self {
            mesh,
            local_bounds,
            transform,
        }
    }
}

/// Read-only view of the static colliders present in the world.
///
/// Iteration order must be stable for the duration of one call; the
/// controller never registers or removes colliders while it iterates.
pub trait ColliderRegistry {
    fn for_each_box_collider(&self, visit: &mut dyn FnMut(&BoxCollider));
    fn for_each_mesh_collider(&self, visit: &mut dyn FnMut(&MeshCollider));
}

/// Canonical definition of an immutable world collider.
#[derive(Clone, Debug)]
pub struct StaticColliderDef {
    pub id: u32,
    pub shape: ColliderShapeDef,
    /// Placement; `None` leaves the shape where it is defined.
    pub transform: Option<ModelTransform>,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Axis-aligned box in the collider's frame.
    Box { bounds: BoundingBox },
    /// Triangle mesh; shared so one model can be placed many times.
    Mesh { mesh: Arc<Mesh> },
}

/// Vec-backed registry of static colliders.
#[derive(Clone, Debug, Default)]
pub struct StaticWorld {
    boxes: Vec<BoxCollider>,
    meshes: Vec<MeshCollider>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world from definitions, ordered by `id` so iteration does not
    /// depend on how the definitions were collected.
    pub fn from_defs(defs: &[StaticColliderDef]) -> Self {
        let mut sorted: Vec<&StaticColliderDef> = defs.iter().collect();
        sorted.sort_by_key(|def| def.id);

        let mut world = Self::new();
        for def in sorted {
            let transform = def.transform.map(|t| t.matrix());
            match &def.shape {
                ColliderShapeDef::Box { bounds } => world.push_box(*bounds, transform),
                ColliderShapeDef::Mesh { mesh } => world.push_mesh(Arc::clone(mesh), transform),
            }
        }
        log::debug!(
            "built static world: {} boxes, {} meshes",
            world.boxes.len(),
            world.meshes.len()
        );
        world
    }

    pub fn push_box(&mut self, bounds: BoundingBox, transform: Option<Mat4>) {
        self.boxes.push(BoxCollider::new(bounds, transform));
    }

    pub fn push_mesh(&mut self, mesh: Arc<Mesh>, transform: Option<Mat4>) {
        self.meshes.push(MeshCollider::new(mesh, transform));
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.meshes.clear();
    }

    pub fn boxes(&self) -> &[BoxCollider] {
        &self.boxes
    }

    pub fn meshes(&self) -> &[MeshCollider] {
        &self.meshes
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty() && self.meshes.is_empty()
    }

    /// Copy of the world inflated by the half extents of `size`.
    ///
    /// Rays cast from an actor's center through the copy stop where that
    /// actor's box would touch the original geometry. Transforms are baked
    /// in first so the inflation is in world units; boxes grow exactly,
    /// meshes through `Mesh::expanded`.
    pub fn expanded(&self, size: &ActorSize) -> Self {
        let extents = size.extents();
        let mut world = Self::new();
        for collider in &self.boxes {
            let bounds = math::world_bounds(&collider.bounds, collider.transform.as_ref());
            world.push_box(BoundingBox::new(bounds.mins - extents, bounds.maxs + extents), None);
        }
        for collider in &self.meshes {
            let baked = Mesh::new(
                collider.mesh.world_vertices(collider.transform.as_ref()),
                collider.mesh.triangles.clone(),
            );
            world.push_mesh(Arc::new(baked.expanded(&extents)), None);
        }
        log::debug!("expanded static world by {extents:?}");
        world
    }
}

impl ColliderRegistry for StaticWorld {
    fn for_each_box_collider(&self, visit: &mut dyn FnMut(&BoxCollider)) {
        self.boxes.iter().for_each(visit);
    }

    fn for_each_mesh_collider(&self, visit: &mut dyn FnMut(&MeshCollider)) {
        self.meshes.iter().for_each(visit);
    }
}
