//! Deterministic sphere sites and meshes
//!
//! Produces unit-sphere site sets and closed triangle meshes over them, for
//! building grids and lookup tables without an external mesh source.

mod delaunay;
mod fibonacci;

pub use delaunay::sphere_mesh;
pub use fibonacci::{fibonacci_sphere_points, fibonacci_sphere_points_with_jitter, DEFAULT_JITTER};

use crate::error::Result;
use crate::mesh::Mesh;

/// Generate a closed unit-sphere mesh with `count` vertices
///
/// Vertices come from a jittered Fibonacci lattice seeded with `seed`, so the
/// same arguments always produce the same mesh. Use `jitter = 0.0` for the most
/// uniform edge lengths.
///
/// # Example
///
/// ```rust
/// use spheroid_grid::generation::generate_sphere_mesh;
///
/// let mesh = generate_sphere_mesh(100, 42, 0.0).unwrap();
/// let topology = mesh.topology().unwrap();
/// assert!(topology.is_closed());
/// assert_eq!(topology.euler_characteristic(), 2);
/// ```
pub fn generate_sphere_mesh(count: usize, seed: u64, jitter: f32) -> Result<Mesh> {
    let points = fibonacci_sphere_points_with_jitter(count, seed, jitter);
    sphere_mesh(&points)
}
