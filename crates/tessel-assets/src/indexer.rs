use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::config::DegenerateUvPolicy;
use crate::error::MeshError;
use crate::mesh::{Mesh, Vertex};
use crate::obj::{FaceIndexTriplet, FaceRecord, RawGeometry};
use crate::tangent::TangentBasis;

/// Builds a deduplicated vertex buffer and matching index buffer from faces.
///
/// Each distinct triplet becomes one vertex, numbered in first-seen order.
/// A triplet seen again only contributes its existing index. The vertex keeps
/// the tangent basis of the face that first referenced it.
#[derive(Debug, Default)]
pub struct MeshIndexer {
    lookup: HashMap<FaceIndexTriplet, u32>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the buffers for roughly `triangles` triangles.
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(triangles),
            vertices: Vec::with_capacity(triangles),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Emit the vertex slots of one face (3 for a triangle, 6 for a quad).
    ///
    /// On error nothing from this face has been recorded.
    pub fn push_face(
        &mut self,
        record: &FaceRecord,
        geometry: &RawGeometry,
        policy: DegenerateUvPolicy,
    ) -> Result<(), MeshError> {
        // Every corner must resolve before anything from the face is emitted.
        let corners = record.face.corners();
        let resolved = corners
            .iter()
            .map(|&triplet| geometry.attributes(triplet, record.line))
            .collect::<Result<Vec<_>, _>>()?;
        let basis = Self::face_basis(&resolved, record.line, policy)?;

        for &corner in record.face.emission_order() {
            let triplet = corners[corner];
            let index = match self.lookup.get(&triplet) {
                Some(&index) => index,
                None => {
                    let (position, tex_coord, normal) = resolved[corner];
                    let index = self.vertices.len() as u32;
                    self.vertices.push(Vertex::new(position, tex_coord, normal, basis));
                    self.lookup.insert(triplet, index);
                    index
                }
            };
            self.indices.push(index);
        }

        Ok(())
    }

    /// Basis of the face's first triangle, from already resolved corners.
    fn face_basis(
        resolved: &[(Vec3, Vec2, Vec3)],
        line: usize,
        policy: DegenerateUvPolicy,
    ) -> Result<TangentBasis, MeshError> {
        let [(p0, uv0, _), (p1, uv1, _), (p2, uv2, _), ..] = *resolved else {
            return Ok(TangentBasis::ZERO);
        };

        match TangentBasis::from_triangle([p0, p1, p2], [uv0, uv1, uv2]) {
            Some(basis) => Ok(basis),
            None => match policy {
                DegenerateUvPolicy::Zero => Ok(TangentBasis::ZERO),
                DegenerateUvPolicy::Fail => Err(MeshError::DegenerateUv { line }),
            },
        }
    }

    /// Number of distinct triplets seen so far.
    pub fn unique_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn finish(self, name: impl Into<String>) -> Mesh {
        Mesh::new(name.into(), self.vertices, self.indices)
    }
}
