//! Spatial structures over triangulated spheres
//!
//! A library for planetary-scale raster simulation: it derives the adjacency
//! topology of a sphere mesh and builds constant-time nearest-site lookups over
//! the unit sphere.
//!
//! # Quick Start
//!
//! ```rust
//! use spheroid_grid::*;
//!
//! // Adjacency of a tetrahedron
//! let faces = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
//! let topology = build_topology(4, &faces).unwrap();
//! assert_eq!(topology.edge_count(), 6);
//!
//! // Nearest-site lookups over the unit sphere
//! let sites = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Y, Vec3::NEG_Z];
//! let voronoi = VoronoiIndex::new(&sites, 0.02, 1.0).unwrap();
//! assert_eq!(voronoi.get(Vec3::new(0.1, 0.9, 0.1).normalize()), Some(1));
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration, meshes, topology and lookup tables

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod mesh;
pub mod topology;
pub mod spatial;
pub mod voronoi;
pub mod grid;
pub mod generation;

// Re-export core types for convenience
pub use error::{SpheroidError, Result};
pub use config::{IndexConfig, IndexConfigBuilder, GridConfig};
pub use cell::{CellId, OCTANT_COUNT};
pub use mesh::Mesh;
pub use topology::{build_topology, FacePair, Topology, VertexPair};
pub use spatial::SpatialIndex;
pub use voronoi::{populate_nearest, SiteId, VoronoiIndex, UNSET};
pub use grid::SpheroidGrid;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
