//! Property-based tests for topology extraction.
//!
//! ## Invariants Tested
//!
//! - **Determinism** - extracting the same mesh twice gives identical output
//! - **Symmetric closure** - every arrow `(a, b)` has a partner `(b, a)`
//! - **Co-occurrence** - arrows are exactly the vertex pairs sharing a face
//! - **Edge count** - `edge_count == arrow_count / 2`
//! - **Neighbor counts** - counts agree with arrows and neighbor lists
//! - **Face pairs** - every recorded face contains both endpoints

use proptest::prelude::*;
use spheroid_grid::*;
use std::collections::HashSet;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for one face with three distinct vertex ids below `vertex_count`
fn face(vertex_count: u32) -> impl Strategy<Value = [u32; 3]> {
    prop::sample::subsequence((0..vertex_count).collect::<Vec<_>>(), 3)
        .prop_shuffle()
        .prop_map(|ids| [ids[0], ids[1], ids[2]])
}

/// Strategy for a vertex count and a list of faces over it
fn mesh_faces() -> impl Strategy<Value = (usize, Vec<[u32; 3]>)> {
    (3u32..24).prop_flat_map(|vertex_count| {
        (
            Just(vertex_count as usize),
            prop::collection::vec(face(vertex_count), 0..40),
        )
    })
}

fn co_occurring_pairs(faces: &[[u32; 3]]) -> HashSet<VertexPair> {
    let mut pairs = HashSet::new();
    for &[a, b, c] in faces {
        for (from, to) in [(a, b), (b, c), (a, c)] {
            pairs.insert((from, to));
            pairs.insert((to, from));
        }
    }
    pairs
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// Property: extraction is a pure function of the mesh
    #[test]
    fn prop_extraction_is_deterministic((vertex_count, faces) in mesh_faces()) {
        let first = build_topology(vertex_count, &faces).unwrap();
        let second = build_topology(vertex_count, &faces).unwrap();

        prop_assert_eq!(first.arrows(), second.arrows());
        prop_assert_eq!(first.edges(), second.edges());
        prop_assert_eq!(first.vertex_neighbor_counts(), second.vertex_neighbor_counts());
        prop_assert_eq!(first, second);
    }

    /// Property: arrows are the symmetric closure of face co-occurrence, without duplicates
    #[test]
    fn prop_arrows_are_symmetric_closure((vertex_count, faces) in mesh_faces()) {
        let topology = build_topology(vertex_count, &faces).unwrap();
        let arrows: HashSet<VertexPair> = topology.arrows().iter().copied().collect();

        prop_assert_eq!(arrows.len(), topology.arrow_count(), "duplicate arrows");
        for &(from, to) in topology.arrows() {
            prop_assert!(arrows.contains(&(to, from)), "missing reverse of ({}, {})", from, to);
        }
        prop_assert_eq!(arrows, co_occurring_pairs(&faces));
    }

    /// Property: one edge per arrow pair, canonical and sorted
    #[test]
    fn prop_edges_are_canonical((vertex_count, faces) in mesh_faces()) {
        let topology = build_topology(vertex_count, &faces).unwrap();

        prop_assert_eq!(topology.edge_count() * 2, topology.arrow_count());
        prop_assert!(topology.edges().iter().all(|&(a, b)| b > a));
        prop_assert!(topology.edges().windows(2).all(|w| w[0] < w[1]), "edges not sorted");
    }

    /// Property: neighbor counts match arrows and neighbor lists
    #[test]
    fn prop_neighbor_counts_consistent((vertex_count, faces) in mesh_faces()) {
        let topology = build_topology(vertex_count, &faces).unwrap();
        let counts = topology.vertex_neighbor_counts();

        prop_assert_eq!(counts.len(), vertex_count);
        prop_assert_eq!(counts.iter().map(|&c| c as usize).sum::<usize>(), topology.arrow_count());
        for vertex in 0..vertex_count as u32 {
            let neighbors = topology.vertex_neighbors(vertex);
            prop_assert_eq!(neighbors.len() as u32, counts[vertex as usize]);
            prop_assert!(neighbors.windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// Property: recorded faces contain both endpoints of their edge
    #[test]
    fn prop_face_pairs_contain_edge((vertex_count, faces) in mesh_faces()) {
        let topology = build_topology(vertex_count, &faces).unwrap();

        for (&(a, b), pair) in topology.edges().iter().zip(topology.edge_face_ids()) {
            prop_assert!(pair.count() >= 1);
            for face_id in pair.iter() {
                let face = faces[face_id as usize];
                prop_assert!(face.contains(&a) && face.contains(&b));
            }
        }
        prop_assert_eq!(topology.flattened_face_vertex_ids().len(), 3 * faces.len());
    }
}

#[test]
fn test_generated_sphere_is_closed_manifold() {
    let mesh = generation::generate_sphere_mesh(300, 11, generation::DEFAULT_JITTER).unwrap();
    let topology = mesh.topology().unwrap();

    assert!(topology.is_closed());
    assert_eq!(topology.non_manifold_edge_count(), 0);
    assert_eq!(topology.boundary_edges().count(), 0);
    assert_eq!(topology.euler_characteristic(), 2);
    assert!(topology
        .edge_face_ids()
        .iter()
        .all(|pair| pair.count() == 2));
}

#[cfg(feature = "serde")]
#[test]
fn test_topology_serialization() {
    let topology = build_topology(4, &[[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]).unwrap();

    let json = serde_json::to_string(&topology).unwrap();
    let restored: Topology = serde_json::from_str(&json).unwrap();
    assert_eq!(topology, restored);
}
