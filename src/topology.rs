//! Mesh topology extraction
//!
//! Derives directed edges ("arrows"), undirected edges, face adjacency and
//! per-vertex neighbor counts from a list of triangles.
//!
//! # Ordering
//!
//! Arrows are sorted by `min(from, to)`, then `max(from, to)`, then `from`, so
//! `(a, b)` and `(b, a)` are always adjacent and the output does not depend on
//! hash iteration order. Edges are the arrows with `to > from`, in the same
//! order.

use std::collections::HashMap;

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{check_id_capacity, Result, SpheroidError};

/// A directed or undirected edge as a pair of vertex ids
pub type VertexPair = (u32, u32);

/// Faces on which both endpoints of an edge co-occur
///
/// A closed manifold mesh has exactly two faces per edge. Boundary edges only
/// fill `a`. Non-manifold edges keep their two lowest face ids.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FacePair {
    pub a: Option<u32>,
    pub b: Option<u32>,
}

impl FacePair {
    fn from_sorted(faces: &[u32]) -> Self {
        Self {
            a: faces.first().copied(),
            b: faces.get(1).copied(),
        }
    }

    /// Number of recorded faces (0, 1 or 2)
    #[inline]
    pub fn count(&self) -> usize {
        self.a.is_some() as usize + self.b.is_some() as usize
    }

    /// Whether the edge lies on a mesh boundary
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.count() == 1
    }

    /// Recorded face ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.a.into_iter().chain(self.b)
    }
}

/// Adjacency data derived once from a triangle mesh
///
/// All buffers are immutable after construction. Arrow and edge buffers are
/// parallel: `arrow_face_ids()[i]` belongs to `arrows()[i]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    vertex_count: usize,
    face_vertex_ids: Vec<[u32; 3]>,
    flattened_face_vertex_ids: Vec<u32>,
    arrow_vertex_ids: Vec<VertexPair>,
    arrow_face_ids: Vec<FacePair>,
    edge_vertex_ids: Vec<VertexPair>,
    edge_face_ids: Vec<FacePair>,
    vertex_neighbor_counts: Vec<u32>,
    // CSR layout: neighbors of v are neighbor_ids[neighbor_offsets[v]..neighbor_offsets[v + 1]]
    neighbor_offsets: Vec<usize>,
    neighbor_ids: Vec<u32>,
    non_manifold_edge_count: usize,
}

/// Extract the adjacency topology of a triangle mesh
///
/// Every face contributes both arrows of each of its three edges; duplicates
/// produced by neighboring faces collapse into one arrow that remembers every
/// face it came from.
///
/// # Errors
///
/// - `VertexOutOfRange` if a face references a vertex `>= vertex_count`
/// - `DegenerateFace` if a face repeats a vertex id
/// - `IdOverflow` if there are more faces than `u32` ids
///
/// # Example
///
/// ```
/// use spheroid_grid::*;
///
/// // tetrahedron
/// let faces = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
/// let topology = build_topology(4, &faces).unwrap();
///
/// assert_eq!(topology.arrow_count(), 12);
/// assert_eq!(topology.edge_count(), 6);
/// assert_eq!(topology.vertex_neighbor_counts(), &[3, 3, 3, 3]);
/// assert!(topology.is_closed());
/// ```
pub fn build_topology(vertex_count: usize, faces: &[[u32; 3]]) -> Result<Topology> {
    validate_faces(vertex_count, faces)?;

    // Step 1: collect arrows and the faces that produced them.
    // Faces are visited in order, so each face list comes out sorted.
    // Face ids fit in u32 after validation.
    let mut arrow_faces: HashMap<VertexPair, Vec<u32>> = HashMap::with_capacity(faces.len() * 3);
    for (face_id, &[a, b, c]) in faces.iter().enumerate() {
        let face_id = face_id as u32;
        for (from, to) in [(a, b), (b, a), (a, c), (c, a), (b, c), (c, b)] {
            arrow_faces.entry((from, to)).or_default().push(face_id);
        }
    }

    // Step 2: sort so that iteration order is reproducible
    let mut arrow_vertex_ids: Vec<VertexPair> = arrow_faces.keys().copied().collect();
    arrow_vertex_ids.sort_unstable_by_key(|&(from, to)| (from.min(to), from.max(to), from));

    let face_pair = |arrow: &VertexPair| {
        arrow_faces
            .get(arrow)
            .map(|faces| FacePair::from_sorted(faces))
            .unwrap_or_default()
    };
    let arrow_face_ids: Vec<FacePair> = arrow_vertex_ids.iter().map(face_pair).collect();

    // Step 3: an arrow becomes an edge only if to > from
    let edge_vertex_ids: Vec<VertexPair> = arrow_vertex_ids
        .iter()
        .copied()
        .filter(|&(from, to)| to > from)
        .collect();
    let edge_face_ids: Vec<FacePair> = edge_vertex_ids.iter().map(face_pair).collect();

    let non_manifold_edge_count = edge_vertex_ids
        .iter()
        .filter(|edge| arrow_faces.get(*edge).map_or(0, Vec::len) > 2)
        .count();
    if non_manifold_edge_count > 0 {
        warn!(
            "non-manifold mesh: {} edges have more than 2 adjacent faces",
            non_manifold_edge_count
        );
    }

    // Step 4: neighbor counts, then neighbor lists in arrow order.
    // Arrows leaving a vertex appear in ascending `to` order, so the lists come out sorted.
    let mut vertex_neighbor_counts = vec![0u32; vertex_count];
    for &(from, _) in &arrow_vertex_ids {
        vertex_neighbor_counts[from as usize] += 1;
    }

    let mut neighbor_offsets = Vec::with_capacity(vertex_count + 1);
    neighbor_offsets.push(0);
    for &count in &vertex_neighbor_counts {
        let last = neighbor_offsets[neighbor_offsets.len() - 1];
        neighbor_offsets.push(last + count as usize);
    }
    let mut cursor = neighbor_offsets.clone();
    let mut neighbor_ids = vec![0u32; arrow_vertex_ids.len()];
    for &(from, to) in &arrow_vertex_ids {
        neighbor_ids[cursor[from as usize]] = to;
        cursor[from as usize] += 1;
    }

    // Step 5: flattened index buffer
    let flattened_face_vertex_ids: Vec<u32> = faces.iter().flatten().copied().collect();

    debug!(
        "extracted topology: {} vertices, {} faces, {} arrows, {} edges",
        vertex_count,
        faces.len(),
        arrow_vertex_ids.len(),
        edge_vertex_ids.len()
    );

    Ok(Topology {
        vertex_count,
        face_vertex_ids: faces.to_vec(),
        flattened_face_vertex_ids,
        arrow_vertex_ids,
        arrow_face_ids,
        edge_vertex_ids,
        edge_face_ids,
        vertex_neighbor_counts,
        neighbor_offsets,
        neighbor_ids,
        non_manifold_edge_count,
    })
}

/// Largest face count that `u32` face ids can number
pub(crate) const FACE_ID_LIMIT: u64 = u32::MAX as u64 + 1;

pub(crate) fn validate_faces(vertex_count: usize, faces: &[[u32; 3]]) -> Result<()> {
    check_id_capacity("faces", faces.len(), FACE_ID_LIMIT)?;
    for (face, ids) in faces.iter().enumerate() {
        if let Some(&vertex) = ids.iter().find(|&&id| id as usize >= vertex_count) {
            return Err(SpheroidError::VertexOutOfRange {
                face,
                vertex,
                vertex_count,
            });
        }
        if ids[0] == ids[1] || ids[1] == ids[2] || ids[0] == ids[2] {
            return Err(SpheroidError::DegenerateFace { face });
        }
    }
    Ok(())
}

impl Topology {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_vertex_ids.len()
    }

    #[inline]
    pub fn arrow_count(&self) -> usize {
        self.arrow_vertex_ids.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_vertex_ids.len()
    }

    /// Faces as given to [`build_topology`]
    #[inline]
    pub fn face_vertex_ids(&self) -> &[[u32; 3]] {
        &self.face_vertex_ids
    }

    /// First, second and third vertex of every face
    pub fn face_vertex_id_a(&self) -> impl Iterator<Item = u32> + '_ {
        self.face_vertex_ids.iter().map(|face| face[0])
    }

    pub fn face_vertex_id_b(&self) -> impl Iterator<Item = u32> + '_ {
        self.face_vertex_ids.iter().map(|face| face[1])
    }

    pub fn face_vertex_id_c(&self) -> impl Iterator<Item = u32> + '_ {
        self.face_vertex_ids.iter().map(|face| face[2])
    }

    /// Face vertex ids interleaved into a `3 * face_count` buffer
    ///
    /// Suitable as an index buffer for renderers.
    #[inline]
    pub fn flattened_face_vertex_ids(&self) -> &[u32] {
        &self.flattened_face_vertex_ids
    }

    /// Directed edges as `(from, to)` pairs
    #[inline]
    pub fn arrows(&self) -> &[VertexPair] {
        &self.arrow_vertex_ids
    }

    pub fn arrow_from(&self) -> impl Iterator<Item = u32> + '_ {
        self.arrow_vertex_ids.iter().map(|&(from, _)| from)
    }

    pub fn arrow_to(&self) -> impl Iterator<Item = u32> + '_ {
        self.arrow_vertex_ids.iter().map(|&(_, to)| to)
    }

    /// Faces adjacent to each arrow
    #[inline]
    pub fn arrow_face_ids(&self) -> &[FacePair] {
        &self.arrow_face_ids
    }

    /// Undirected edges as `(a, b)` pairs with `b > a`
    #[inline]
    pub fn edges(&self) -> &[VertexPair] {
        &self.edge_vertex_ids
    }

    pub fn edge_a(&self) -> impl Iterator<Item = u32> + '_ {
        self.edge_vertex_ids.iter().map(|&(a, _)| a)
    }

    pub fn edge_b(&self) -> impl Iterator<Item = u32> + '_ {
        self.edge_vertex_ids.iter().map(|&(_, b)| b)
    }

    /// Faces adjacent to each edge
    #[inline]
    pub fn edge_face_ids(&self) -> &[FacePair] {
        &self.edge_face_ids
    }

    /// Number of arrows leaving each vertex
    #[inline]
    pub fn vertex_neighbor_counts(&self) -> &[u32] {
        &self.vertex_neighbor_counts
    }

    /// Vertices sharing a face with `vertex`, ascending
    ///
    /// Returns an empty slice for an out-of-range vertex.
    pub fn vertex_neighbors(&self, vertex: u32) -> &[u32] {
        let vertex = vertex as usize;
        if vertex >= self.vertex_count {
            return &[];
        }
        &self.neighbor_ids[self.neighbor_offsets[vertex]..self.neighbor_offsets[vertex + 1]]
    }

    /// Edges with a single adjacent face
    pub fn boundary_edges(&self) -> impl Iterator<Item = VertexPair> + '_ {
        self.edge_vertex_ids
            .iter()
            .zip(&self.edge_face_ids)
            .filter(|(_, faces)| faces.is_boundary())
            .map(|(&edge, _)| edge)
    }

    /// Number of edges shared by more than two faces
    #[inline]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.non_manifold_edge_count
    }

    /// Whether every edge is shared by exactly two faces
    pub fn is_closed(&self) -> bool {
        self.non_manifold_edge_count == 0 && self.edge_face_ids.iter().all(|faces| faces.count() == 2)
    }

    /// V - E + F; 2 for a closed mesh of genus 0
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count as i64 - self.edge_count() as i64 + self.face_count() as i64
    }
}
