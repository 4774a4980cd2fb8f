//! Triangle meshes for static level geometry.
//!
//! A mesh is plain data: vertex positions plus index triples. Triangle
//! winding defines the facet normal (`(b - a) x (c - a)`), which ray casts
//! use to reject back faces.

use crate::collision::types::{BoundingBox, Mat4, Point3, Vec3};
use crate::math;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

/// Orientation transform of a placed model: scale, then rotate about an axis,
/// then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelTransform {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation_axis: Vec3,
    pub rotation_angle_deg: f32,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation_axis: Vec3::z(),
            rotation_angle_deg: 0.0,
        }
    }
}

impl ModelTransform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Homogeneous matrix; a zero rotation axis means no rotation.
    pub fn matrix(&self) -> Mat4 {
        let scale = Mat4::new_nonuniform_scaling(&self.scale);
        let rotation = nalgebra::Unit::try_new(self.rotation_axis, f32::EPSILON)
            .map(|axis| {
                nalgebra::Rotation3::from_axis_angle(&axis, self.rotation_angle_deg.to_radians())
                    .to_homogeneous()
            })
            .unwrap_or_else(Mat4::identity);
        let translation = Mat4::new_translation(&self.position);
        translation * rotation * scale
    }
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of triangle `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Local-space envelope; a zero-size box at the origin for an empty mesh.
    pub fn bounding_box(&self) -> BoundingBox {
        math::bounds_of_points(&self.vertices).unwrap_or_else(|| {
            BoundingBox::new(Point3::origin(), Point3::origin())
        })
    }

    /// Vertex positions under an optional reference frame.
    pub fn world_vertices(&self, transform: Option<&Mat4>) -> Vec<Vec3> {
        match transform {
            Some(m) => math::transform_points(&self.vertices, m),
            None => self.vertices.clone(),
        }
    }

    /// Regular grid centered on the origin in the XY plane.
    ///
    /// `res_x * res_y` cells, `(res_x + 1) * (res_y + 1)` vertices, vertex
    /// heights sampled from `height(x, y)`. Triangles wind counter-clockwise
    /// seen from above, so a flat grid faces +Z.
    pub fn grid_plane(
        width: f32,
        length: f32,
        res_x: u32,
        res_y: u32,
        height: impl Fn(f32, f32) -> f32,
    ) -> Self {
        let res_x = res_x.max(1);
        let res_y = res_y.max(1);
        let cols = res_x + 1;
        let rows = res_y + 1;

        let mut vertices = Vec::with_capacity((cols * rows) as usize);
        for y in 0..rows {
            let y_pos = (y as f32 / res_y as f32 - 0.5) * length;
            for x in 0..cols {
                let x_pos = (x as f32 / res_x as f32 - 0.5) * width;
                vertices.push(Vec3::new(x_pos, y_pos, height(x_pos, y_pos)));
            }
        }

        let mut triangles = Vec::with_capacity((res_x * res_y * 2) as usize);
        for y in 0..res_y {
            for x in 0..res_x {
                let i = x + y * cols;
                triangles.push([i + cols, i, i + 1]);
                triangles.push([i + cols, i + 1, i + cols + 1]);
            }
        }

        Self::new(vertices, triangles)
    }

    /// Closed box with outward facets.
    pub fn solid_box(half_extents: Vec3) -> Self {
        Self::box_faces(half_extents, false)
    }

    /// Closed box with inward facets: a room seen from inside.
    pub fn inverted_box(half_extents: Vec3) -> Self {
        Self::box_faces(half_extents, true)
    }

    fn box_faces(h: Vec3, inward: bool) -> Self {
        let mut mesh = Self::default();
        // (outward normal, two tangents spanning the face)
        let faces = [
            (Vec3::x(), Vec3::y(), Vec3::z()),
            (-Vec3::x(), Vec3::y(), Vec3::z()),
            (Vec3::y(), Vec3::x(), Vec3::z()),
            (-Vec3::y(), Vec3::x(), Vec3::z()),
            (Vec3::z(), Vec3::x(), Vec3::y()),
            (-Vec3::z(), Vec3::x(), Vec3::y()),
        ];
        for (normal, s, t) in faces {
            let center = normal.component_mul(&h);
            let s = s.component_mul(&h);
            let t = t.component_mul(&h);
            let quad = [center - s - t, center + s - t, center + s + t, center - s + t];
            let facing = if inward { -normal } else { normal };
            mesh.push_quad(quad, &facing);
        }
        mesh
    }

    /// Append a planar quad as two triangles wound to face `facing`.
    fn push_quad(&mut self, quad: [Vec3; 4], facing: &Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        let n = (quad[1] - quad[0]).cross(&(quad[2] - quad[0]));
        if n.dot(facing) >= 0.0 {
            self.triangles.push([base, base + 1, base + 2]);
            self.triangles.push([base, base + 2, base + 3]);
        } else {
            self.triangles.push([base, base + 2, base + 1]);
            self.triangles.push([base, base + 3, base + 2]);
        }
    }

    /// Inflate the mesh by an actor's half extents.
    ///
    /// Every vertex position moves along the average of the facet normals
    /// around it, scaled per axis by `size`. Vertices sharing a position move
    /// together; an axis no facet normal points along stays put. A point-sized
    /// actor (zero `size`) gets an unchanged copy.
    pub fn expanded(&self, size: &Vec3) -> Self {
        // Representative vertex for every distinct position.
        let mut canonical: Vec<usize> = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            let first = self.vertices[..i]
                .iter()
                .position(|other| other == v)
                .unwrap_or(i);
            canonical.push(first);
        }

        let mut push = vec![Vec3::zeros(); self.vertices.len()];
        let mut weight = vec![Vec3::zeros(); self.vertices.len()];
        for tri in &self.triangles {
            let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
            let Some(normal) = (b - a).cross(&(c - a)).try_normalize(f32::EPSILON) else {
                continue;
            };
            for i in tri {
                let root = canonical[*i as usize];
                push[root] += normal.component_mul(size);
                weight[root] += normal;
            }
        }

        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let root = canonical[i];
                let offset = push[root].zip_map(&weight[root], |p, w| {
                    if w.abs() <= f32::EPSILON { 0.0 } else { p / w.abs() }
                });
                v + offset
            })
            .collect();

        Self::new(vertices, self.triangles.clone())
    }
}
