//! Triangle meshes
//!
//! A mesh is the raw input of the crate: vertex positions plus triangles of
//! vertex ids. Everything else (topology, grids, lookups) is derived from it.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::topology::{build_topology, Topology};

/// Vertex positions and triangular faces
///
/// Faces keep the winding they were given with. Construction checks that every
/// face references existing, distinct vertices.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a mesh from positions and faces
    ///
    /// # Errors
    ///
    /// - `VertexOutOfRange` if a face references a missing vertex
    /// - `DegenerateFace` if a face repeats a vertex id
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self> {
        crate::topology::validate_faces(positions.len(), &faces)?;
        Ok(Self { positions, faces })
    }

    /// Get the number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh has no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Positions as plain arrays, e.g. for vertex buffers
    pub fn position_buffer(&self) -> Vec<[f32; 3]> {
        self.positions.iter().map(|p| p.to_array()).collect()
    }

    /// Centroid of every face
    pub fn face_midpoints(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                (self.positions[a as usize] + self.positions[b as usize] + self.positions[c as usize]) / 3.0
            })
            .collect()
    }

    /// Unit normal of every face following its winding
    ///
    /// Faces with zero area get a zero normal.
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                let a = self.positions[a as usize];
                let b = self.positions[b as usize];
                let c = self.positions[c as usize];
                (b - a).cross(c - a).normalize_or_zero()
            })
            .collect()
    }

    /// Derive the adjacency topology of this mesh
    pub fn topology(&self) -> Result<Topology> {
        build_topology(self.positions.len(), &self.faces)
    }
}
