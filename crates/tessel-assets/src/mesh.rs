use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::tangent::TangentBasis;

/// Interleaved vertex layout handed to the renderer for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, tex_coord: Vec2, normal: Vec3, basis: TangentBasis) -> Self {
        Self {
            position: position.to_array(),
            tex_coord: tex_coord.to_array(),
            normal: normal.to_array(),
            tangent: basis.tangent.to_array(),
            bitangent: basis.bitangent.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Summary of a loaded mesh, for logs and tooling output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub name: String,
    pub vertices: usize,
    pub indices: usize,
    pub triangles: usize,
    pub bounds: Option<Aabb>,
}

/// An indexed triangle-list mesh. Read-only once built.
///
/// Every index is less than the vertex count and the index count is a
/// multiple of three.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    pub(crate) fn new(name: String, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(indices.len() % 3, 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self {
            name,
            vertices,
            indices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex positions in buffer order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(Vertex::position)
    }

    /// Raw vertex buffer contents, ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index buffer contents (`u32` per index).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let mut positions = self.positions();
        let first = positions.next()?;
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            name: self.name.clone(),
            vertices: self.vertex_count(),
            indices: self.index_count(),
            triangles: self.triangle_count(),
            bounds: self.bounds(),
        }
    }
}
