//! Sphere meshes via convex hull
//!
//! For points on a sphere, the Delaunay triangulation is the 3D convex hull of
//! those points, which parry3d computes directly. The hull is a closed
//! manifold with outward-facing triangles.

use glam::Vec3;
use parry3d::math::Point;
use parry3d::transformation;

use crate::error::{Result, SpheroidError};
use crate::mesh::Mesh;

/// Triangulate points on a sphere into a closed mesh
///
/// Points strictly inside the hull are dropped and the remaining vertices
/// may be reordered, so vertex ids of the result do not match input indices.
///
/// # Errors
///
/// Returns `EmptyInput` for fewer than 4 points, since no closed mesh exists.
pub fn sphere_mesh(points: &[Vec3]) -> Result<Mesh> {
    if points.len() < 4 {
        return Err(SpheroidError::EmptyInput(format!(
            "a closed sphere mesh needs at least 4 points (got {})",
            points.len()
        )));
    }

    let points: Vec<Point<f32>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
    let (vertices, triangles) = transformation::convex_hull(&points);

    let positions = vertices.iter().map(|v| Vec3::new(v.x, v.y, v.z)).collect();
    Mesh::new(positions, triangles)
}
