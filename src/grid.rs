//! SpheroidGrid main structure

use std::collections::{HashSet, VecDeque};

use glam::Vec3;
use log::debug;

use crate::config::GridConfig;
use crate::error::{Result, SpheroidError};
use crate::mesh::Mesh;
use crate::topology::Topology;
use crate::voronoi::{SiteId, VoronoiIndex};

/// A mesh over a sphere with everything rasters need cached
///
/// Each vertex is a grid cell. The grid caches the mesh topology, the offset
/// and length of every arrow, and a nearest-vertex lookup table so that any
/// direction can be mapped to a vertex in O(1).
///
/// Meshes of any radius are accepted. Arrow geometry is measured on the mesh
/// as given, while nearest-vertex lookups work on directions: vertices are
/// projected onto the unit sphere for the lookup table.
///
/// # Examples
///
/// ```
/// use spheroid_grid::*;
///
/// let mesh = generation::generate_sphere_mesh(100, 42, 0.0).unwrap();
/// let grid = SpheroidGrid::new(mesh).unwrap();
///
/// let vertex = grid.nearest_vertex(Vec3::new(0.2, 0.3, 0.9).normalize());
/// assert!(vertex.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SpheroidGrid {
    mesh: Mesh,
    topology: Topology,
    arrow_offsets: Vec<Vec3>,
    arrow_lengths: Vec<f32>,
    arrow_average_distance: f32,
    voronoi: VoronoiIndex,
}

impl SpheroidGrid {
    /// Build a grid with the default [`GridConfig`]
    pub fn new(mesh: Mesh) -> Result<Self> {
        Self::with_config(mesh, GridConfig::default())
    }

    /// Build a grid, deriving its lookup table parameters from `config`
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if the mesh has no faces
    /// - `InvalidConfig` if the derived lookup parameters are invalid, e.g. when
    ///   every vertex points in the same direction
    pub fn with_config(mesh: Mesh, config: GridConfig) -> Result<Self> {
        let topology = mesh.topology()?;
        if topology.arrow_count() == 0 {
            return Err(SpheroidError::EmptyInput("grid mesh has no faces".to_string()));
        }

        let positions = mesh.positions();
        let arrow_offsets: Vec<Vec3> = topology
            .arrows()
            .iter()
            .map(|&(from, to)| positions[to as usize] - positions[from as usize])
            .collect();
        let arrow_lengths: Vec<f32> = arrow_offsets.iter().map(|offset| offset.length()).collect();
        let arrow_average_distance = arrow_lengths.iter().sum::<f32>() / arrow_lengths.len() as f32;

        // the lookup table lives on the unit sphere, so its parameters come from
        // arrows between the projected vertices rather than the raw offsets
        let sites: Vec<Vec3> = positions.iter().map(|p| p.normalize_or_zero()).collect();
        let (min_length, max_length) = topology.arrows().iter().fold(
            (f32::INFINITY, 0.0f32),
            |(min, max), &(from, to)| {
                let length = sites[from as usize].distance(sites[to as usize]);
                (min.min(length), max.max(length))
            },
        );
        let index_config = config.index_config(min_length, max_length)?;
        let voronoi = VoronoiIndex::from_config(&sites, index_config)?;

        debug!(
            "built grid: {} vertices, arrow lengths {}..{}, cell width {}",
            mesh.vertex_count(),
            min_length,
            max_length,
            index_config.cell_width
        );

        Ok(Self {
            mesh,
            topology,
            arrow_offsets,
            arrow_lengths,
            arrow_average_distance,
            voronoi,
        })
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Get the number of grid cells (one per vertex)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    #[inline]
    pub fn vertex_positions(&self) -> &[Vec3] {
        self.mesh.positions()
    }

    /// `position[to] - position[from]` for every arrow
    #[inline]
    pub fn arrow_offsets(&self) -> &[Vec3] {
        &self.arrow_offsets
    }

    #[inline]
    pub fn arrow_lengths(&self) -> &[f32] {
        &self.arrow_lengths
    }

    /// Mean length over all arrows
    #[inline]
    pub fn arrow_average_distance(&self) -> f32 {
        self.arrow_average_distance
    }

    #[inline]
    pub fn voronoi(&self) -> &VoronoiIndex {
        &self.voronoi
    }

    /// Find the vertex nearest to a direction
    ///
    /// `direction` does not need to be normalized. Returns `None` only when the
    /// direction falls outside the range of every vertex, which does not happen
    /// on a well-formed sphere mesh.
    #[inline]
    pub fn nearest_vertex(&self, direction: Vec3) -> Option<SiteId> {
        self.voronoi.get(direction.normalize_or_zero())
    }

    /// Find vertices within a given hop count from a center vertex (BFS)
    ///
    /// Includes the center itself. Returns an empty vec for an invalid vertex.
    /// The result is sorted by vertex id.
    pub fn vertices_within_hops(&self, center: u32, hops: usize) -> Vec<u32> {
        if center as usize >= self.vertex_count() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(center);
        queue.push_back((center, 0));

        while let Some((vertex, depth)) = queue.pop_front() {
            if depth == hops {
                continue;
            }
            for &neighbor in self.topology.vertex_neighbors(vertex) {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        let mut vertices: Vec<u32> = visited.into_iter().collect();
        vertices.sort_unstable();
        vertices
    }

    /// Estimate the gradient of a per-vertex scalar field
    ///
    /// Uses the Gauss-Green theorem over a circle around each vertex reaching
    /// halfway to its neighbors: the flux `(f[to] - f[from]) * offset` is summed
    /// over arrows leaving the vertex, averaged over its neighbors, and divided
    /// by the circle's area (π cancels out).
    ///
    /// # Errors
    ///
    /// Returns `FieldLength` if `field` does not have one value per vertex
    pub fn gradient(&self, field: &[f32]) -> Result<Vec<Vec3>> {
        if field.len() != self.vertex_count() {
            return Err(SpheroidError::FieldLength {
                expected: self.vertex_count(),
                actual: field.len(),
            });
        }

        let mut result = vec![Vec3::ZERO; field.len()];
        for (&(from, to), &offset) in self.topology.arrows().iter().zip(&self.arrow_offsets) {
            let df = field[to as usize] - field[from as usize];
            result[from as usize] += df * offset;
        }

        let half = self.arrow_average_distance / 2.0;
        let area = half * half;
        for (value, &count) in result.iter_mut().zip(self.topology.vertex_neighbor_counts()) {
            if count > 0 {
                *value /= count as f32 * area;
            }
        }

        Ok(result)
    }
}
